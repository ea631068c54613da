use crate::constants;
use dotmatrix::{SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::Sdl;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub struct SdlContext {
    pub sdl: Sdl,
    pub canvas: Canvas<Window>,
    pub texture_creator: TextureCreator<WindowContext>,
    pub event_pump: sdl2::EventPump,
    pub audio_device: AudioDevice<RingPlayer>,
    pub audio_queue: Arc<Mutex<VecDeque<u8>>>,
}

/// Audio callback pulling interleaved u8 stereo from the shared queue; the
/// main loop is the producer. Underruns play silence.
pub struct RingPlayer {
    queue: Arc<Mutex<VecDeque<u8>>>,
}

impl AudioCallback for RingPlayer {
    type Channel = u8;

    fn callback(&mut self, out: &mut [u8]) {
        let mut queue = self.queue.lock().unwrap();
        for slot in out.iter_mut() {
            *slot = queue.pop_front().unwrap_or(0);
        }
    }
}

pub fn init_sdl(window_title: &str) -> Result<SdlContext, String> {
    let sdl = sdl2::init()?;
    let video = sdl.video()?;

    let window = video
        .window(
            window_title,
            SCREEN_WIDTH as u32 * constants::WINDOW_SCALE,
            SCREEN_HEIGHT as u32 * constants::WINDOW_SCALE,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();

    let audio = sdl.audio()?;
    let audio_queue: Arc<Mutex<VecDeque<u8>>> = Arc::new(Mutex::new(VecDeque::new()));
    let spec = AudioSpecDesired {
        freq: Some(constants::AUDIO_SAMPLE_RATE as i32),
        channels: Some(2),
        samples: Some(constants::AUDIO_BUFFER_SAMPLES),
    };
    let queue = audio_queue.clone();
    let audio_device = audio.open_playback(None, &spec, |_| RingPlayer { queue })?;
    audio_device.resume();

    let event_pump = sdl.event_pump()?;

    Ok(SdlContext { sdl, canvas, texture_creator, event_pump, audio_device, audio_queue })
}
