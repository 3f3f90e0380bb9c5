use super::key_buffer::KeyBuffer;
use chip_8_vm::emulator::keymap::key_for_char;
use chip_8_vm::emulator::Key;
use crossterm::event::{poll, read, Event, KeyCode};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const HOLD_TIMEOUT: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Default)]
struct SharedData {
    stop: bool,
    quit_requested: bool,
}

/// Listens for terminal key events on its own thread and translates
/// them to keypad keys.
pub struct KeyManager {
    shared_data: Arc<Mutex<SharedData>>,
    key_buffer: Arc<KeyBuffer>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {

    // Start event listener thread
    pub fn new() -> KeyManager {
        let shared_data = Arc::new(Mutex::new(SharedData::default()));
        let key_buffer = Arc::new(KeyBuffer::new(HOLD_TIMEOUT));
        let event_listener = event_listener(shared_data.clone(), key_buffer.clone());
        KeyManager {
            shared_data,
            key_buffer,
            event_listener: Some(event_listener),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.key_buffer.is_held(key)
    }

    /// Whether escape was pressed.
    pub fn quit_requested(&self) -> bool {
        self.shared_data.lock().unwrap_or_else(PoisonError::into_inner).quit_requested
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        self.shared_data.lock().unwrap_or_else(PoisonError::into_inner).stop = true;
        if let Some(handle) = self.event_listener.take() {
            if handle.join().is_err() {
                log::error!("Key event listener panicked");
            }
        }
    }
}

/// Starts a thread that pushes keypad presses into the key buffer until told to stop.
fn event_listener(shared_data: Arc<Mutex<SharedData>>, key_buffer: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        if shared_data.lock().unwrap_or_else(PoisonError::into_inner).stop {
            break;
        }

        let event = match poll(POLL_INTERVAL).and_then(|ready| if ready { read().map(Some) } else { Ok(None) }) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                log::error!("Could not read terminal events: {}", e);
                shared_data.lock().unwrap_or_else(PoisonError::into_inner).quit_requested = true;
                break;
            }
        };
        log::debug!("Got event {:?}", event);

        if let Event::Key(key_event) = event {
            match key_event.code {
                KeyCode::Esc => {
                    shared_data.lock().unwrap_or_else(PoisonError::into_inner).quit_requested = true;
                }
                KeyCode::Char(c) => {
                    if let Some(key) = key_for_char(c) {
                        key_buffer.push(key);
                    }
                }
                _ => {}
            }
        }
    })
}
