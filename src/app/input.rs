use dotmatrix::{Button, GameBoy};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

/// Keyboard layout: arrows for the pad, Z/X for A/B, Return/Backspace for
/// Start/Select (WASD and J/K as alternates).
fn map_key(key: Keycode) -> Option<Button> {
    match key {
        Keycode::Right | Keycode::D => Some(Button::Right),
        Keycode::Left | Keycode::A => Some(Button::Left),
        Keycode::Up | Keycode::W => Some(Button::Up),
        Keycode::Down | Keycode::S => Some(Button::Down),
        Keycode::Z | Keycode::J => Some(Button::A),
        Keycode::X | Keycode::K => Some(Button::B),
        Keycode::Backspace | Keycode::RShift => Some(Button::Select),
        Keycode::Return | Keycode::Space => Some(Button::Start),
        _ => None,
    }
}

/// Drains the event pump into button edges. Returns true on a quit request.
pub fn handle_input(event_pump: &mut sdl2::EventPump, gb: &mut GameBoy) -> bool {
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. } => return true,
            Event::KeyDown { keycode: Some(Keycode::Escape), .. } => return true,
            Event::KeyDown { keycode: Some(key), repeat: false, .. } => {
                if let Some(button) = map_key(key) {
                    gb.press(button);
                }
            }
            Event::KeyUp { keycode: Some(key), .. } => {
                if let Some(button) = map_key(key) {
                    gb.release(button);
                }
            }
            _ => {}
        }
    }
    false
}
