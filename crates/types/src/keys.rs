//! Logical key codes handed to the application, and the raw scancodes the
//! keyboard device reports.

pub const KEY_RIGHTARROW: u8 = 0xae;
pub const KEY_LEFTARROW: u8 = 0xac;
pub const KEY_UPARROW: u8 = 0xad;
pub const KEY_DOWNARROW: u8 = 0xaf;
pub const KEY_USE: u8 = 0xa2;
pub const KEY_FIRE: u8 = 0xa3;
pub const KEY_ESCAPE: u8 = 27;
pub const KEY_ENTER: u8 = 13;
pub const KEY_TAB: u8 = 9;
pub const KEY_F1: u8 = 0x80 + 0x3b;
pub const KEY_F2: u8 = 0x80 + 0x3c;
pub const KEY_F3: u8 = 0x80 + 0x3d;
pub const KEY_F4: u8 = 0x80 + 0x3e;
pub const KEY_F5: u8 = 0x80 + 0x3f;
pub const KEY_F6: u8 = 0x80 + 0x40;
pub const KEY_F7: u8 = 0x80 + 0x41;
pub const KEY_F8: u8 = 0x80 + 0x42;
pub const KEY_F9: u8 = 0x80 + 0x43;
pub const KEY_F10: u8 = 0x80 + 0x44;
pub const KEY_F11: u8 = 0x80 + 0x57;
pub const KEY_F12: u8 = 0x80 + 0x58;
pub const KEY_BACKSPACE: u8 = 0x7f;
pub const KEY_PAUSE: u8 = 0xff;
pub const KEY_EQUALS: u8 = 0x3d;
pub const KEY_MINUS: u8 = 0x2d;
pub const KEY_RSHIFT: u8 = 0x80 + 0x36;
pub const KEY_RALT: u8 = 0x80 + 0x38;

/// Linux evdev scancodes, as indexed in a keyboard snapshot.
pub mod scancode {
    pub const ESC: u8 = 1;
    pub const MINUS: u8 = 12;
    pub const EQUAL: u8 = 13;
    pub const BACKSPACE: u8 = 14;
    pub const TAB: u8 = 15;
    pub const Y: u8 = 21;
    pub const ENTER: u8 = 28;
    pub const LEFTCTRL: u8 = 29;
    pub const A: u8 = 30;
    pub const LEFTSHIFT: u8 = 42;
    pub const N: u8 = 49;
    pub const RIGHTSHIFT: u8 = 54;
    pub const LEFTALT: u8 = 56;
    pub const SPACE: u8 = 57;
    pub const F1: u8 = 59;
    pub const F10: u8 = 68;
    pub const F11: u8 = 87;
    pub const F12: u8 = 88;
    pub const UP: u8 = 103;
    pub const LEFT: u8 = 105;
    pub const RIGHT: u8 = 106;
    pub const DOWN: u8 = 108;
    pub const PAUSE: u8 = 119;
}

/// A press or release edge, packed as `(pressed << 8) | key`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent(u16);

impl KeyEvent {
    pub const fn new(pressed: bool, key: u8) -> Self {
        Self(((pressed as u16) << 8) | key as u16)
    }

    pub const fn pressed(&self) -> bool {
        self.0 >> 8 != 0
    }

    pub const fn key(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub const fn raw(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_flag_above_key() {
        let ev = KeyEvent::new(true, KEY_FIRE);
        assert_eq!(ev.raw(), 0x1a3);
        assert!(ev.pressed());
        assert_eq!(ev.key(), KEY_FIRE);
        assert!(!KeyEvent::new(false, KEY_FIRE).pressed());
    }
}
