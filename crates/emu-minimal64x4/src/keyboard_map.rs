//! Host keyboard → PS/2 key mapping.
//!
//! Maps winit `KeyCode` values to `Ps2Key` for the windowed binary. F1 and
//! F4 are left unmapped; the frontend uses them for reset and upload.

use winit::keyboard::KeyCode;

use crate::keyboard::Ps2Key;

/// Map a host key to a PS/2 key.
///
/// Returns `None` for unmapped keys.
#[must_use]
pub fn map_keycode(key: KeyCode) -> Option<Ps2Key> {
    match key {
        // Letters
        KeyCode::KeyA => Some(Ps2Key::A),
        KeyCode::KeyB => Some(Ps2Key::B),
        KeyCode::KeyC => Some(Ps2Key::C),
        KeyCode::KeyD => Some(Ps2Key::D),
        KeyCode::KeyE => Some(Ps2Key::E),
        KeyCode::KeyF => Some(Ps2Key::F),
        KeyCode::KeyG => Some(Ps2Key::G),
        KeyCode::KeyH => Some(Ps2Key::H),
        KeyCode::KeyI => Some(Ps2Key::I),
        KeyCode::KeyJ => Some(Ps2Key::J),
        KeyCode::KeyK => Some(Ps2Key::K),
        KeyCode::KeyL => Some(Ps2Key::L),
        KeyCode::KeyM => Some(Ps2Key::M),
        KeyCode::KeyN => Some(Ps2Key::N),
        KeyCode::KeyO => Some(Ps2Key::O),
        KeyCode::KeyP => Some(Ps2Key::P),
        KeyCode::KeyQ => Some(Ps2Key::Q),
        KeyCode::KeyR => Some(Ps2Key::R),
        KeyCode::KeyS => Some(Ps2Key::S),
        KeyCode::KeyT => Some(Ps2Key::T),
        KeyCode::KeyU => Some(Ps2Key::U),
        KeyCode::KeyV => Some(Ps2Key::V),
        KeyCode::KeyW => Some(Ps2Key::W),
        KeyCode::KeyX => Some(Ps2Key::X),
        KeyCode::KeyY => Some(Ps2Key::Y),
        KeyCode::KeyZ => Some(Ps2Key::Z),

        // Digits
        KeyCode::Digit0 => Some(Ps2Key::N0),
        KeyCode::Digit1 => Some(Ps2Key::N1),
        KeyCode::Digit2 => Some(Ps2Key::N2),
        KeyCode::Digit3 => Some(Ps2Key::N3),
        KeyCode::Digit4 => Some(Ps2Key::N4),
        KeyCode::Digit5 => Some(Ps2Key::N5),
        KeyCode::Digit6 => Some(Ps2Key::N6),
        KeyCode::Digit7 => Some(Ps2Key::N7),
        KeyCode::Digit8 => Some(Ps2Key::N8),
        KeyCode::Digit9 => Some(Ps2Key::N9),

        // Punctuation
        KeyCode::Backquote => Some(Ps2Key::Backquote),
        KeyCode::Minus => Some(Ps2Key::Minus),
        KeyCode::Equal => Some(Ps2Key::Equals),
        KeyCode::BracketLeft => Some(Ps2Key::LeftBracket),
        KeyCode::BracketRight => Some(Ps2Key::RightBracket),
        KeyCode::Backslash => Some(Ps2Key::Backslash),
        KeyCode::Semicolon => Some(Ps2Key::Semicolon),
        KeyCode::Quote => Some(Ps2Key::Quote),
        KeyCode::Comma => Some(Ps2Key::Comma),
        KeyCode::Period => Some(Ps2Key::Period),
        KeyCode::Slash => Some(Ps2Key::Slash),

        // Editing
        KeyCode::Space => Some(Ps2Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Ps2Key::Enter),
        KeyCode::Tab => Some(Ps2Key::Tab),
        KeyCode::Backspace => Some(Ps2Key::Backspace),
        KeyCode::Escape => Some(Ps2Key::Escape),

        // Cursor
        KeyCode::ArrowUp => Some(Ps2Key::Up),
        KeyCode::ArrowDown => Some(Ps2Key::Down),
        KeyCode::ArrowLeft => Some(Ps2Key::Left),
        KeyCode::ArrowRight => Some(Ps2Key::Right),

        // Modifiers
        KeyCode::ShiftLeft => Some(Ps2Key::LeftShift),
        KeyCode::ShiftRight => Some(Ps2Key::RightShift),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Ps2Key::Ctrl),
        KeyCode::AltLeft | KeyCode::AltRight => Some(Ps2Key::Alt),

        _ => None,
    }
}
