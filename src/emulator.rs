//! The virtual machine and the small pieces a host needs around it.

pub mod config;
pub mod emulator;
pub mod error;
pub mod input;
pub mod instruction;
pub mod keymap;
pub mod output;
pub mod rom;
pub mod screen;

pub use self::config::Config;
pub use self::emulator::{Emulator, State};
pub use self::error::{Fault, InvalidKeyCode, LoadError};
pub use self::input::Key;
pub use self::output::{Mute, Speaker};
pub use self::rom::Rom;
pub use self::screen::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
