//! PS/2 keyboard.
//!
//! The board has a PS/2 port feeding a shift register. Each key event
//! arrives as scan code set 2 bytes: the make code on press, and
//! [`BREAK_PREFIX`] followed by the make code on release. Extended keys
//! (arrows) are sent without their $E0 prefix, which the OS on the
//! machine does not expect.

/// Sent before the make code of a released key.
pub const BREAK_PREFIX: u8 = 0xF0;

/// A key on the PS/2 keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ps2Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    // Digits
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    // Punctuation
    Backquote,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    // Editing
    Space,
    Enter,
    Tab,
    Backspace,
    Escape,
    // Cursor
    Up,
    Down,
    Left,
    Right,
    // Modifiers
    LeftShift,
    RightShift,
    Ctrl,
    Alt,
}

impl Ps2Key {
    /// Set 2 make code.
    #[must_use]
    pub const fn scan_code(self) -> u8 {
        match self {
            Self::A => 0x1C,
            Self::B => 0x32,
            Self::C => 0x21,
            Self::D => 0x23,
            Self::E => 0x24,
            Self::F => 0x2B,
            Self::G => 0x34,
            Self::H => 0x33,
            Self::I => 0x43,
            Self::J => 0x3B,
            Self::K => 0x42,
            Self::L => 0x4B,
            Self::M => 0x3A,
            Self::N => 0x31,
            Self::O => 0x44,
            Self::P => 0x4D,
            Self::Q => 0x15,
            Self::R => 0x2D,
            Self::S => 0x1B,
            Self::T => 0x2C,
            Self::U => 0x3C,
            Self::V => 0x2A,
            Self::W => 0x1D,
            Self::X => 0x22,
            Self::Y => 0x35,
            Self::Z => 0x1A,

            Self::N0 => 0x45,
            Self::N1 => 0x16,
            Self::N2 => 0x1E,
            Self::N3 => 0x26,
            Self::N4 => 0x25,
            Self::N5 => 0x2E,
            Self::N6 => 0x36,
            Self::N7 => 0x3D,
            Self::N8 => 0x3E,
            Self::N9 => 0x46,

            Self::Backquote => 0x0E,
            Self::Minus => 0x4E,
            Self::Equals => 0x55,
            Self::LeftBracket => 0x54,
            Self::RightBracket => 0x5B,
            Self::Backslash => 0x5D,
            Self::Semicolon => 0x4C,
            Self::Quote => 0x52,
            Self::Comma => 0x41,
            Self::Period => 0x49,
            Self::Slash => 0x4A,

            Self::Space => 0x29,
            Self::Enter => 0x5A,
            Self::Tab => 0x0D,
            Self::Backspace => 0x66,
            Self::Escape => 0x76,

            Self::Up => 0x75,
            Self::Down => 0x72,
            Self::Left => 0x6B,
            Self::Right => 0x74,

            Self::LeftShift => 0x12,
            Self::RightShift => 0x59,
            Self::Ctrl => 0x14,
            Self::Alt => 0x11,
        }
    }

    /// Bytes the keyboard sends for a press or release.
    #[must_use]
    pub fn event_bytes(self, pressed: bool) -> Vec<u8> {
        if pressed {
            vec![self.scan_code()]
        } else {
            vec![BREAK_PREFIX, self.scan_code()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sends_make_code_only() {
        assert_eq!(Ps2Key::A.event_bytes(true), [0x1C]);
        assert_eq!(Ps2Key::Enter.event_bytes(true), [0x5A]);
    }

    #[test]
    fn release_sends_break_prefix() {
        assert_eq!(Ps2Key::Space.event_bytes(false), [0xF0, 0x29]);
    }

    #[test]
    fn arrows_have_no_extended_prefix() {
        assert_eq!(Ps2Key::Up.event_bytes(true), [0x75]);
        assert_eq!(Ps2Key::Left.event_bytes(false), [0xF0, 0x6B]);
    }

    #[test]
    fn no_key_uses_the_break_prefix_as_make_code() {
        let keys = [Ps2Key::A, Ps2Key::N0, Ps2Key::Slash, Ps2Key::Escape, Ps2Key::Alt];
        assert!(keys.iter().all(|k| k.scan_code() != BREAK_PREFIX));
    }
}
