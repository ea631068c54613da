use std::time::Duration;

/// Integer scale factor for the 160x144 panel.
pub const WINDOW_SCALE: u32 = 4;

/// Host pacing target: the hardware frame rate is ~59.73 Hz.
pub const TARGET_FRAME_DURATION: Duration = Duration::from_nanos(16_742_706);

/// Audio device request.
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;
pub const AUDIO_BUFFER_SAMPLES: u16 = 1024;

/// Cap on queued audio before the feeder drops old samples (stereo bytes).
pub const AUDIO_QUEUE_LIMIT: usize = 16 * 1024;
