use chip_8_vm::emulator::Key;
use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

/// A thread-safe record of when each keypad key was last pressed.
/// Terminals report presses and auto-repeats but no releases, so a key
/// counts as held until `timeout` has passed since its last press.
/// Wrap it in an `std::sync::Arc` to share it with the event listener.
pub struct KeyBuffer {
    timeout: Duration,
    last_pressed: Mutex<[Option<Instant>; 16]>,
}

impl KeyBuffer {

    pub fn new(timeout: Duration) -> KeyBuffer {
        KeyBuffer {
            timeout,
            last_pressed: Mutex::new([None; 16]),
        }
    }

    /// Record a press of `key`.
    pub fn push(&self, key: Key) {
        let mut guard = self.last_pressed.lock().unwrap_or_else(PoisonError::into_inner);
        guard[key.code() as usize] = Some(Instant::now());
    }

    /// Whether `key` was pressed recently enough to still count as held.
    pub fn is_held(&self, key: Key) -> bool {
        let guard = self.last_pressed.lock().unwrap_or_else(PoisonError::into_inner);
        guard[key.code() as usize]
            .map(|pressed| pressed.elapsed() < self.timeout)
            .unwrap_or(false)
    }
}
