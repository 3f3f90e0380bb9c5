//! Small helpers that are not specific to the virtual machine.

pub mod bit_splitter;
pub mod verbosity;
