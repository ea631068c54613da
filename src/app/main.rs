//! SDL2 front-end for the emulator core: window, audio device, keyboard,
//! and cartridge/save file I/O.

use dotmatrix::GameBoy;
use std::{env, fs, path::Path, path::PathBuf, thread, time::Instant};

mod constants;
mod drawing;
mod input;
mod sdl_setup;

fn save_path(rom_path: &Path) -> PathBuf {
    rom_path.with_extension("sav")
}

fn main() -> Result<(), String> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <rom_path>", args[0]);
        std::process::exit(1);
    }
    let rom_path = Path::new(&args[1]);

    let rom = fs::read(rom_path)
        .map_err(|e| format!("failed to read ROM '{}': {}", rom_path.display(), e))?;
    let mut gb = GameBoy::with_sample_rate(rom, constants::AUDIO_SAMPLE_RATE)?;
    let window_title = format!("dotmatrix - {}", gb.title());

    // Battery RAM: restore from disk and write back whenever the program
    // commits its RAM.
    let sav = save_path(rom_path);
    if let Ok(data) = fs::read(&sav) {
        gb.load_battery_ram(&data);
    }
    let battery_target = sav.clone();
    gb.set_battery_hook(Box::new(move |ram| {
        if let Err(e) = fs::write(&battery_target, ram) {
            log::warn!("battery save failed: {}", e);
        }
    }));

    let mut sdl = sdl_setup::init_sdl(&window_title)?;
    let mut screen = drawing::create_screen_texture(&sdl.texture_creator)?;

    'main_loop: loop {
        let frame_start = Instant::now();

        if input::handle_input(&mut sdl.event_pump, &mut gb) {
            break 'main_loop;
        }

        gb.step_frame();
        if gb.cpu.locked() {
            let (site, _) = dotmatrix::Cpu::disassemble(gb.cpu.pc(), &gb.bus);
            eprintln!("CPU locked up at {:04X} ({})", gb.cpu.pc(), site);
            break 'main_loop;
        }

        // Feed the audio thread, dropping backlog if the queue runs ahead.
        {
            let samples = gb.take_audio();
            let mut queue = sdl.audio_queue.lock().unwrap();
            queue.extend(samples);
            while queue.len() > constants::AUDIO_QUEUE_LIMIT {
                queue.pop_front();
            }
        }

        drawing::draw_frame(&mut sdl.canvas, &mut screen, gb.frame())?;

        let elapsed = frame_start.elapsed();
        if elapsed < constants::TARGET_FRAME_DURATION {
            thread::sleep(constants::TARGET_FRAME_DURATION - elapsed);
        }
    }

    sdl.audio_device.pause();

    // Flush battery RAM on exit so progress survives a plain close.
    if gb.bus.cart.has_battery() && !gb.battery_ram().is_empty() {
        let _ = fs::write(&sav, gb.battery_ram());
    }

    Ok(())
}
