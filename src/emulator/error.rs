use thiserror::Error;

/// Reasons a program could not be placed in memory.
///
/// A failed load leaves the emulator exactly as it was.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read ROM: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM is {size} bytes, but only {max} bytes fit above the load address")]
    RomTooLarge { size: usize, max: usize },

    #[error("load address {0:#06x} is outside memory")]
    InvalidBaseAddress(u16),
}

/// A key code outside `0x0..=0xF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid key code {0:#04x}, expected 0x0..=0xF")]
pub struct InvalidKeyCode(pub u8);

/// A defect hit while executing an instruction.
///
/// The instruction that faults has no effect beyond having advanced the
/// program counter past itself, and the timers are not ticked on that step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("call stack overflow at {pc:#06x}: more than 16 nested calls")]
    StackOverflow { pc: u16 },

    #[error("return with an empty call stack at {pc:#06x}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at {address:#06x}")]
    MemoryOutOfBounds { address: usize },

    #[error("unknown opcode {opcode:#06x} at {pc:#06x}")]
    UnknownOpcode { opcode: u16, pc: u16 },
}
