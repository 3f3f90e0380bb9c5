//! Translation from a QWERTY keyboard to the hexadecimal keypad.
//!
//! The left-hand 4x4 block of the keyboard stands in for the keypad:
//!
//! ```text
//! 1 2 3 4        1 2 3 C
//! Q W E R   ->   4 5 6 D
//! A S D F        7 8 9 E
//! Z X C V        A 0 B F
//! ```

use crate::emulator::input::Key;

const LAYOUT: [(char, u8); 16] = [
    ('1', 0x1), ('2', 0x2), ('3', 0x3), ('4', 0xC),
    ('q', 0x4), ('w', 0x5), ('e', 0x6), ('r', 0xD),
    ('a', 0x7), ('s', 0x8), ('d', 0x9), ('f', 0xE),
    ('z', 0xA), ('x', 0x0), ('c', 0xB), ('v', 0xF),
];

/// The keypad key bound to a keyboard character, ignoring case.
pub fn key_for_char(c: char) -> Option<Key> {
    let c = c.to_ascii_lowercase();
    LAYOUT
        .iter()
        .find(|(bound, _)| *bound == c)
        .and_then(|(_, code)| Key::new(*code).ok())
}
