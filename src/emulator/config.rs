//! Knobs that change how the emulator behaves at the edges of the instruction set.

use crate::emulator::emulator::PC_START;

/// What to do with opcodes outside the instruction set, including `0NNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcodes {
    /// Skip them, as the original interpreters did.
    Ignore,
    /// Stop with [`Fault::UnknownOpcode`](crate::emulator::error::Fault::UnknownOpcode).
    Fault,
}

impl Default for UnknownOpcodes {
    fn default() -> Self {
        UnknownOpcodes::Ignore
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where programs are loaded and where execution starts.
    pub load_address: u16,
    pub unknown_opcodes: UnknownOpcodes,
    /// Seed for `CXNN`. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            load_address: PC_START,
            unknown_opcodes: UnknownOpcodes::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn with_load_address(mut self, load_address: u16) -> Self {
        self.load_address = load_address;
        self
    }

    /// Fault on unknown opcodes instead of skipping them.
    pub fn strict(mut self) -> Self {
        self.unknown_opcodes = UnknownOpcodes::Fault;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
