/// A structure for splitting a big-endian instruction word
/// into the fields the CHIP-8 instruction set is written in.
///
/// ```text
///  F X Y N
///    +-NN-+
///  +--NNN-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {

    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    pub fn new(high: u8, low: u8) -> BitSplitter {
        BitSplitter(high, low)
    }

    /// Shift the high byte up 8 bits and OR in the low byte.
    pub fn as_u16(&self) -> u16 {
        (u16::from(self.0) << 8) | u16::from(self.1)
    }

    /// The four nibbles, most significant first: `(F, X, Y, N)`.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    /// Operation family, bits 12-15.
    pub fn family(&self) -> u8 {
        self.0 >> 4
    }

    /// First register operand, bits 8-11.
    pub fn x(&self) -> u8 {
        self.0 & 0x0F
    }

    /// Second register operand, bits 4-7.
    pub fn y(&self) -> u8 {
        self.1 >> 4
    }

    pub fn n(&self) -> u8 {
        self.1 & 0x0F
    }

    pub fn nn(&self) -> u8 {
        self.1
    }

    pub fn nnn(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}
