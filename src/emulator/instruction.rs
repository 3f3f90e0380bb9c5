use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers. Only the low nibble is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
///
/// `VF` doubles as the carry, borrow and collision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    AddRegWithCarry(Reg, Reg), // 8XY4
    SubRegWithBorrow(Reg, Reg), // 8XY5
    ShiftRight(Reg), // 8XY6
    ReverseSubWithBorrow(Reg, Reg), // 8XY7
    ShiftLeft(Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    JumpV0PlusAddr(Addr), // BNNN
    SetRegToRandom(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyPressed(Reg), // EX9E
    IfKeyNotPressed(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    WaitForKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToGlyph(Reg), // FX29
    StoreBcd(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
    /// Anything else, including `0NNN` machine code routines.
    Unknown(u16),
}

impl Instruction {

    pub fn from_u16(value: u16) -> Instruction {
        Instruction::decode(BitSplitter::from_u16(value))
    }

    pub fn from_two_u8(high: u8, low: u8) -> Instruction {
        Instruction::decode(BitSplitter::new(high, low))
    }

    fn decode(word: BitSplitter) -> Instruction {
        let addr = Addr(word.nnn());
        let nn = Const(word.nn());
        match word.nibbles() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Goto(addr),
            (2, _, _, _) => Instruction::Call(addr),
            (3, x, _, _) => Instruction::IfRegEqConst(Reg(x), nn),
            (4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), nn),
            (5, x, y, 0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::SetRegToConst(Reg(x), nn),
            (7, x, _, _) => Instruction::IncRegByConst(Reg(x), nn),
            (8, x, y, 0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::AddRegWithCarry(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::SubRegWithBorrow(Reg(x), Reg(y)),
            (8, x, _, 6) => Instruction::ShiftRight(Reg(x)),
            (8, x, y, 7) => Instruction::ReverseSubWithBorrow(Reg(x), Reg(y)),
            (8, x, _, 0xE) => Instruction::ShiftLeft(Reg(x)),
            (9, x, y, 0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(addr),
            (0xB, _, _, _) => Instruction::JumpV0PlusAddr(addr),
            (0xC, x, _, _) => Instruction::SetRegToRandom(Reg(x), nn),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::IfKeyPressed(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::IfKeyNotPressed(Reg(x)),
            (0xF, x, 0, 7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::WaitForKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::SetIToGlyph(Reg(x)),
            (0xF, x, 3, 3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 5, 5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 6, 5) => Instruction::RegLoad(Reg(x)),
            _ => Instruction::Unknown(word.as_u16()),
        }
    }
}
