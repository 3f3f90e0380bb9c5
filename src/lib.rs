/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The left-hand 4x4 block of the keyboard (`1234`, `qwer`, `asdf`, `zxcv`) is the keypad,
and escape quits. `headless` runs a program for a fixed number of cycles and prints the screen.

# Library

`Emulator::new()` gives you a silent machine. Nothing runs on its own:
every call to `step()` executes one instruction and counts both timers down once,
so pacing is up to the caller.

```rust
use chip_8_vm::emulator::Emulator;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let mut emulator = Emulator::new();

// Load a program at address 0x200.
let program = [
    0x60, 0x05, // V0 = 5
    0xF0, 0x29, // I = glyph for V0
    0xD1, 0x15, // draw it at (V1, V1)
];
emulator.load(&program)?;
for _ in 0..3 {
    emulator.step()?;
}

assert!(emulator.take_redraw());
assert_eq!(emulator.pixel(0, 0), Some(1));
# Ok(())
# }
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip_8_vm::emulator::Emulator;
use chip_8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

emulator.execute(Instruction::Goto(Addr(0x250))).unwrap();
emulator.execute(Instruction::SetRegToConst(Reg(0xA), Const(35))).unwrap();
emulator.execute(Instruction::SetRegToReg(Reg(0xB), Reg(0xA))).unwrap();
assert_eq!(emulator.registers()[0xB], 35);
```

## Keys and sound

Keys are pushed into the machine with `set_key` and `clear_key`.
The buzzer is any `Speaker`, and closures work:

```rust
use chip_8_vm::emulator::{Emulator, Key};

let mut beeps = 0;
let mut emulator = Emulator::with_speaker(|| beeps += 1);
emulator.load(&[0x60, 0x01, 0xF0, 0x18, 0xF3, 0x0A]).unwrap(); // ST = 1, then wait for a key

emulator.step().unwrap();
emulator.step().unwrap();
emulator.step().unwrap();
assert!(emulator.is_waiting_for_key());

emulator.set_key(Key::new(0xA).unwrap());
emulator.step().unwrap();
assert_eq!(emulator.registers()[3], 0xA);

drop(emulator);
assert_eq!(beeps, 1);
```
*/

pub mod emulator;
pub mod util;
