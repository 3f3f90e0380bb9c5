use std::io::Read;
use std::path::Path;

use crate::emulator::emulator::{MEM_SIZE, PC_START};
use crate::emulator::error::LoadError;

/// A program image, checked to fit in memory above the default load address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    bytes: Vec<u8>,
}

impl Rom {
    pub const MAX_SIZE: usize = MEM_SIZE - PC_START as usize;

    /// Read a ROM file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Rom, LoadError> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("Read {} bytes from {:?}", bytes.len(), path.as_ref());
        Rom::from_bytes(bytes)
    }

    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Rom, LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Rom::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Rom, LoadError> {
        if bytes.len() > Rom::MAX_SIZE {
            return Err(LoadError::RomTooLarge {
                size: bytes.len(),
                max: Rom::MAX_SIZE,
            });
        }
        Ok(Rom { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
