use std::convert::TryFrom;

use crate::emulator::error::InvalidKeyCode;

const NUM_KEYS: usize = 16;

/// One of the 16 logical keys of the hexadecimal keypad, `0x0..=0xF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(u8);

impl Key {
    pub fn new(code: u8) -> Result<Key, InvalidKeyCode> {
        if (code as usize) < NUM_KEYS {
            Ok(Key(code))
        } else {
            Err(InvalidKeyCode(code))
        }
    }

    /// Keys named by a register value only look at its low nibble.
    pub(crate) fn from_low_nibble(value: u8) -> Key {
        Key(value & 0x0F)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// Every key, in ascending order.
    pub fn all() -> impl Iterator<Item = Key> {
        (0..NUM_KEYS as u8).map(Key)
    }
}

impl TryFrom<u8> for Key {
    type Error = InvalidKeyCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Key::new(code)
    }
}

/// Which keys the host currently holds down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed[key.0 as usize] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.pressed[key.0 as usize] = false;
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.0 as usize]
    }

    /// Scans the whole keypad, so when several keys are down the one with
    /// the highest code wins.
    pub fn highest_pressed(&self) -> Option<Key> {
        Key::all().filter(|key| self.is_pressed(*key)).last()
    }
}
