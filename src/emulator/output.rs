/// Something that can make the CHIP-8 buzzer sound.
///
/// The emulator calls `beep` from inside `step()` on the cycle where the
/// sound timer runs out. Any `FnMut()` closure is a speaker.
pub trait Speaker {
    fn beep(&mut self);
}

/// A speaker that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mute;

impl Speaker for Mute {
    fn beep(&mut self) {}
}

impl<F: FnMut()> Speaker for F {
    fn beep(&mut self) {
        self()
    }
}
