//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use std::fmt;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emulator::config::{Config, UnknownOpcodes};
use crate::emulator::error::{Fault, LoadError};
use crate::emulator::input::{Key, Keypad};
use crate::emulator::instruction::*;
use crate::emulator::output::{Mute, Speaker};
use crate::emulator::rom::Rom;
use crate::emulator::screen::Screen;

pub const MEM_SIZE: usize = 4096;
pub const PC_START: u16 = 0x200;
const NUM_REGISTERS: usize = 16;
const STACK_SIZE: usize = 16;
const FLAG: usize = 0xF;
const GLYPH_SIZE: u16 = 5;
const ADDR_MASK: u16 = 0x0FFF;
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Whether the machine is executing or blocked in `FX0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    /// Waiting for a key, whose code goes into the register.
    WaitingForKey(Reg),
}

pub struct Emulator<S: Speaker = Mute> {
    // Standard fields
    memory: [u8; MEM_SIZE],
    registers: [u8; NUM_REGISTERS],
    delay_timer: u8,
    sound_timer: u8,
    i: u16,
    program_counter: u16,
    stack_pointer: u8,
    stack: [u16; STACK_SIZE],

    screen: Screen,
    redraw: bool,
    keypad: Keypad,
    state: State,

    speaker: S,
    rng: StdRng,
    config: Config,
}

impl Emulator<Mute> {

    /// Create a new emulator without sound
    pub fn new() -> Emulator<Mute> {
        Emulator::with_speaker(Mute)
    }
}

impl Default for Emulator<Mute> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Speaker> Emulator<S> {

    /// Create a new emulator that beeps through `speaker`
    pub fn with_speaker(speaker: S) -> Emulator<S> {
        Emulator::with_config(Config::default(), speaker)
    }

    pub fn with_config(config: Config, speaker: S) -> Emulator<S> {
        let mut memory = [0; MEM_SIZE];
        memory[..FONT.len()].copy_from_slice(&FONT);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Emulator {
            memory,
            registers: [0; NUM_REGISTERS],
            delay_timer: 0,
            sound_timer: 0,
            i: 0,
            program_counter: config.load_address,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],

            screen: Screen::new(),
            redraw: false,
            keypad: Keypad::new(),
            state: State::Running,

            speaker,
            rng,
            config,
        }
    }

    /// Copy a program into memory at the configured load address.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.load_at(program, self.config.load_address)
    }

    pub fn load_rom(&mut self, rom: &Rom) -> Result<(), LoadError> {
        self.load(rom.as_bytes())
    }

    /// Copy a program into memory starting at `base`. Memory is untouched on error.
    pub fn load_at(&mut self, program: &[u8], base: u16) -> Result<(), LoadError> {
        let start = base as usize;
        if start >= MEM_SIZE {
            return Err(LoadError::InvalidBaseAddress(base));
        }

        let max = MEM_SIZE - start;
        if program.len() > max {
            return Err(LoadError::RomTooLarge { size: program.len(), max });
        }

        self.memory[start..start + program.len()].copy_from_slice(program);
        log::debug!("Loaded {} bytes at {:#06x}", program.len(), base);
        Ok(())
    }

    /// Perform a single step. While waiting for a key this only polls the
    /// keypad; otherwise it loads an instruction, executes it and then
    /// updates the timers.
    pub fn step(&mut self) -> Result<(), Fault> {

        if let State::WaitingForKey(reg) = self.state {
            self.poll_keypad(reg);
            return Ok(());
        }

        // Each opcode is two bytes, big-endian
        let pc = self.program_counter as usize;
        let word = self.span(pc, 2)?;
        let instruction = Instruction::from_two_u8(self.memory[word.start], self.memory[word.start + 1]);

        log::trace!("{:#06x}: {:?}", pc, instruction);

        self.program_counter += 2;
        self.execute(instruction)?;
        self.tick_timers();
        Ok(())
    }

    /// Execute a single instruction without fetching it or touching the timers.
    /// The program counter is taken to already point past the instruction.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Fault> {
        match instruction {

            Instruction::ClearScreen => {
                self.screen.clear();
                self.redraw = true;
            }

            // Return to the previous call site via the stack.
            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(Fault::StackUnderflow { pc: self.instruction_address() });
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer as usize];
            }

            Instruction::Goto(Addr(addr)) => {
                self.program_counter = addr & ADDR_MASK;
            }

            // Store the return address on the stack, then jump.
            Instruction::Call(Addr(addr)) => {
                if self.stack_pointer as usize == STACK_SIZE {
                    return Err(Fault::StackOverflow { pc: self.instruction_address() });
                }
                self.stack[self.stack_pointer as usize] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = addr & ADDR_MASK;
            }

            Instruction::IfRegEqConst(x, Const(n)) => self.skip_if(self.reg(x) == n),

            Instruction::IfRegNeqConst(x, Const(n)) => self.skip_if(self.reg(x) != n),

            Instruction::IfRegEqReg(x, y) => self.skip_if(self.reg(x) == self.reg(y)),

            Instruction::SetRegToConst(x, Const(n)) => self.set_reg(x, n),

            // No carry flag, unlike the register form.
            Instruction::IncRegByConst(x, Const(n)) => {
                self.set_reg(x, self.reg(x).wrapping_add(n));
            }

            Instruction::SetRegToReg(x, y) => self.set_reg(x, self.reg(y)),

            Instruction::BitwiseOr(x, y) => self.set_reg(x, self.reg(x) | self.reg(y)),

            Instruction::BitwiseAnd(x, y) => self.set_reg(x, self.reg(x) & self.reg(y)),

            Instruction::BitwiseXor(x, y) => self.set_reg(x, self.reg(x) ^ self.reg(y)),

            Instruction::AddRegWithCarry(x, y) => {
                let (sum, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.set_reg_with_flag(x, sum, carry as u8);
            }

            // VF is "not borrow", strictly Vx > Vy.
            Instruction::SubRegWithBorrow(x, y) => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.set_reg_with_flag(x, vx.wrapping_sub(vy), (vx > vy) as u8);
            }

            Instruction::ShiftRight(x) => {
                let vx = self.reg(x);
                self.set_reg_with_flag(x, vx >> 1, vx & 1);
            }

            Instruction::ReverseSubWithBorrow(x, y) => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.set_reg_with_flag(x, vy.wrapping_sub(vx), (vy > vx) as u8);
            }

            Instruction::ShiftLeft(x) => {
                let vx = self.reg(x);
                self.set_reg_with_flag(x, vx << 1, vx >> 7);
            }

            Instruction::IfRegNeqReg(x, y) => self.skip_if(self.reg(x) != self.reg(y)),

            Instruction::SetI(Addr(addr)) => {
                self.i = addr;
            }

            Instruction::JumpV0PlusAddr(Addr(addr)) => {
                self.program_counter = u16::from(self.registers[0]) + (addr & ADDR_MASK);
            }

            Instruction::SetRegToRandom(x, Const(n)) => {
                let value = self.rng.gen::<u8>() & n;
                self.set_reg(x, value);
            }

            Instruction::Draw(x, y, Const(height)) => {
                self.draw(self.reg(x), self.reg(y), height)?;
            }

            Instruction::IfKeyPressed(x) => {
                let key = Key::from_low_nibble(self.reg(x));
                self.skip_if(self.keypad.is_pressed(key));
            }

            Instruction::IfKeyNotPressed(x) => {
                let key = Key::from_low_nibble(self.reg(x));
                self.skip_if(!self.keypad.is_pressed(key));
            }

            Instruction::SetRegToDelayTimer(x) => self.set_reg(x, self.delay_timer),

            Instruction::WaitForKey(x) => {
                log::debug!("Waiting for a key into {:?}", x);
                self.state = State::WaitingForKey(x);
            }

            Instruction::SetDelayTimerToReg(x) => {
                self.delay_timer = self.reg(x);
            }

            Instruction::SetSoundTimerToReg(x) => {
                self.sound_timer = self.reg(x);
            }

            Instruction::AddRegToI(x) => {
                self.i = self.i.wrapping_add(u16::from(self.reg(x)));
            }

            // Each font glyph is 5 bytes, starting at address 0.
            Instruction::SetIToGlyph(x) => {
                self.i = u16::from(self.reg(x)) * GLYPH_SIZE;
            }

            Instruction::StoreBcd(x) => {
                let value = self.reg(x);
                let digits = self.span(self.i as usize, 3)?;
                self.memory[digits].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                let count = (x & 0x0F) as usize + 1;
                let target = self.span(self.i as usize, count)?;
                self.memory[target].copy_from_slice(&self.registers[..count]);
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                let count = (x & 0x0F) as usize + 1;
                let source = self.span(self.i as usize, count)?;
                self.registers[..count].copy_from_slice(&self.memory[source]);
            }

            Instruction::Unknown(opcode) => match self.config.unknown_opcodes {
                UnknownOpcodes::Ignore => log::warn!("Ignoring unknown opcode {:#06x}", opcode),
                UnknownOpcodes::Fault => {
                    return Err(Fault::UnknownOpcode { opcode, pc: self.instruction_address() })
                }
            },
        };

        Ok(())
    }

    /// XOR a sprite of `height` rows read from `I` onto the screen at `(x0, y0)`.
    /// VF ends up 1 if any lit pixel was turned off.
    fn draw(&mut self, x0: u8, y0: u8, height: u8) -> Result<(), Fault> {
        let rows = self.span(self.i as usize, height as usize)?;

        self.registers[FLAG] = 0;
        let mut collision = false;
        for (dy, row) in self.memory[rows].iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80 >> dx) != 0 {
                    collision |= self.screen.flip(x0 as usize + dx, y0 as usize + dy);
                }
            }
        }
        self.registers[FLAG] = collision as u8;

        self.redraw = true;
        Ok(())
    }

    fn poll_keypad(&mut self, reg: Reg) {
        if let Some(key) = self.keypad.highest_pressed() {
            log::debug!("Got key {:#x}, resuming", key.code());
            self.set_reg(reg, key.code());
            self.state = State::Running;
        }
    }

    /// Both timers count down once per executed instruction.
    fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            if self.sound_timer == 1 {
                self.speaker.beep();
            }
            self.sound_timer -= 1;
        }
    }

    /// The memory range `start..start + len`, or a fault if any of it is outside memory.
    fn span(&self, start: usize, len: usize) -> Result<Range<usize>, Fault> {
        if len == 0 {
            return Ok(0..0);
        }
        if start + len > MEM_SIZE {
            return Err(Fault::MemoryOutOfBounds { address: start.max(MEM_SIZE) });
        }
        Ok(start..start + len)
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// Address of the instruction being executed, the PC having moved past it.
    fn instruction_address(&self) -> u16 {
        self.program_counter.wrapping_sub(2)
    }

    fn reg(&self, Reg(x): Reg) -> u8 {
        self.registers[(x & 0x0F) as usize]
    }

    fn set_reg(&mut self, Reg(x): Reg, value: u8) {
        self.registers[(x & 0x0F) as usize] = value;
    }

    /// The flag goes in first, so when `x` is VF the result is what remains.
    fn set_reg_with_flag(&mut self, x: Reg, value: u8, flag: u8) {
        self.registers[FLAG] = flag;
        self.set_reg(x, value);
    }

    pub fn set_key(&mut self, key: Key) {
        self.keypad.press(key);
    }

    pub fn clear_key(&mut self, key: Key) {
        self.keypad.release(key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keypad.is_pressed(key)
    }

    /// The pixel at `(x, y)`, 0 or 1, or `None` outside the 64x32 screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        self.screen.get(x, y)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Whether the screen changed since the last `take_redraw`.
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Consume the redraw signal.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state != State::Running
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8; MEM_SIZE] {
        &self.memory
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }
}

impl<S: Speaker> fmt::Display for Emulator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.screen)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use test_case::test_case;

    fn key(code: u8) -> Key {
        Key::new(code).unwrap()
    }

    /// An emulator with V`x` = `a` and V`y` = `b`.
    fn with_registers(x: u8, a: u8, y: u8, b: u8) -> Emulator {
        let mut emulator = Emulator::new();
        emulator.registers[x as usize] = a;
        emulator.registers[y as usize] = b;
        emulator
    }

    #[test]
    fn starts_zeroed_with_font_loaded() {
        let emulator = Emulator::new();
        assert_eq!(emulator.program_counter(), 0x200);
        assert_eq!(emulator.registers(), &[0; 16]);
        assert_eq!(emulator.index(), 0);
        assert_eq!(&emulator.memory()[..80], &FONT[..]);
        assert!(emulator.memory()[80..].iter().all(|byte| *byte == 0));
        assert_eq!(emulator.screen().lit_pixels(), 0);
        assert_eq!(emulator.state(), State::Running);
        assert!(!emulator.needs_redraw());
    }

    #[test]
    fn load_copies_at_0x200() {
        let mut emulator = Emulator::new();
        emulator.load(&[0xAB, 0xCD]).unwrap();
        assert_eq!(&emulator.memory()[0x200..0x203], &[0xAB, 0xCD, 0x00]);
    }

    #[test]
    fn oversized_load_leaves_memory_untouched() {
        let mut emulator = Emulator::new();
        let result = emulator.load(&[0xFF; 4096 - 512 + 1]);
        assert!(matches!(result, Err(LoadError::RomTooLarge { size: 3585, max: 3584 })));
        assert!(emulator.memory()[0x200..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn load_at_checks_the_base_address() {
        let mut emulator = Emulator::new();
        assert!(matches!(emulator.load_at(&[1], 0x1000), Err(LoadError::InvalidBaseAddress(0x1000))));
        assert!(matches!(emulator.load_at(&[1, 2], 0xFFF), Err(LoadError::RomTooLarge { size: 2, max: 1 })));
        emulator.load_at(&[7], 0xFFF).unwrap();
        assert_eq!(emulator.memory()[0xFFF], 7);
    }

    #[test]
    fn goto_goes_to() {
        let mut emulator = Emulator::new();
        emulator.execute(Instruction::Goto(Addr(0x250))).unwrap();
        assert_eq!(emulator.program_counter, 0x250);
    }

    #[test]
    fn return_after_call_is_neutral() {
        let mut emulator = Emulator::new();
        assert_eq!(emulator.program_counter, 0x200);

        // Write program with call and return
        let program = [
            0x22, 0x06, // 0x200, call 0x206
            0x00, 0x00, // 0x202
            0x00, 0x00, // 0x204
            0x00, 0xEE  // 0x206, return
        ];
        emulator.load(&program).unwrap();

        emulator.step().unwrap(); // Call 0x206
        assert_eq!(emulator.program_counter, 0x206);
        emulator.step().unwrap(); // Return to 202
        assert_eq!(emulator.program_counter, 0x202);
        assert_eq!(emulator.stack_pointer, 0);
    }

    #[test]
    fn sixteen_nested_calls_fit_but_not_seventeen() {
        let mut emulator = Emulator::new();
        for _ in 0..16 {
            emulator.execute(Instruction::Call(Addr(0x300))).unwrap();
        }
        assert_eq!(emulator.execute(Instruction::Call(Addr(0x300))), Err(Fault::StackOverflow { pc: 0x2FE }));
        assert_eq!(emulator.stack_pointer, 16);
    }

    #[test]
    fn return_on_empty_stack_faults() {
        let mut emulator = Emulator::new();
        assert_eq!(emulator.execute(Instruction::Return), Err(Fault::StackUnderflow { pc: 0x1FE }));
        assert_eq!(emulator.program_counter, 0x200);
    }

    #[test_case(Instruction::IfRegEqConst(Reg(1), Const(5)), 5 => 0x202 ; "eq const taken")]
    #[test_case(Instruction::IfRegEqConst(Reg(1), Const(5)), 6 => 0x200 ; "eq const not taken")]
    #[test_case(Instruction::IfRegNeqConst(Reg(1), Const(5)), 6 => 0x202 ; "neq const taken")]
    #[test_case(Instruction::IfRegNeqConst(Reg(1), Const(5)), 5 => 0x200 ; "neq const not taken")]
    #[test_case(Instruction::IfRegEqReg(Reg(1), Reg(2)), 9 => 0x202 ; "eq reg taken")]
    #[test_case(Instruction::IfRegEqReg(Reg(1), Reg(2)), 8 => 0x200 ; "eq reg not taken")]
    #[test_case(Instruction::IfRegNeqReg(Reg(1), Reg(2)), 8 => 0x202 ; "neq reg taken")]
    #[test_case(Instruction::IfRegNeqReg(Reg(1), Reg(2)), 9 => 0x200 ; "neq reg not taken")]
    fn skips(instruction: Instruction, v1: u8) -> u16 {
        let mut emulator = with_registers(1, v1, 2, 9);
        emulator.execute(instruction).unwrap();
        emulator.program_counter
    }

    #[test]
    fn add_const_wraps_without_touching_vf() {
        let mut emulator = with_registers(3, 0xFF, 0xF, 0x42);
        emulator.execute(Instruction::IncRegByConst(Reg(3), Const(2))).unwrap();
        assert_eq!(emulator.registers[3], 1);
        assert_eq!(emulator.registers[0xF], 0x42);
    }

    #[test_case(Instruction::SetRegToReg(Reg(1), Reg(2)), 0b0110 ; "copy")]
    #[test_case(Instruction::BitwiseOr(Reg(1), Reg(2)), 0b1110 ; "or")]
    #[test_case(Instruction::BitwiseAnd(Reg(1), Reg(2)), 0b1000 ; "and")]
    #[test_case(Instruction::BitwiseXor(Reg(1), Reg(2)), 0b1010 ; "xor")]
    fn logic_ops(instruction: Instruction, expected: u8) {
        let mut emulator = with_registers(1, 0b1100, 2, 0b0110);
        emulator.execute(instruction).unwrap();
        assert_eq!(emulator.registers[1], expected);
    }

    proptest! {
        #[test]
        fn add_sets_carry_iff_overflow(a in any::<u8>(), b in any::<u8>()) {
            let mut emulator = with_registers(1, a, 2, b);
            emulator.execute(Instruction::AddRegWithCarry(Reg(1), Reg(2))).unwrap();
            prop_assert_eq!(emulator.registers[1], a.wrapping_add(b));
            prop_assert_eq!(emulator.registers[0xF], (u16::from(a) + u16::from(b) > 255) as u8);
        }

        #[test]
        fn sub_sets_not_borrow_iff_greater(a in any::<u8>(), b in any::<u8>()) {
            let mut emulator = with_registers(1, a, 2, b);
            emulator.execute(Instruction::SubRegWithBorrow(Reg(1), Reg(2))).unwrap();
            prop_assert_eq!(emulator.registers[1], a.wrapping_sub(b));
            prop_assert_eq!(emulator.registers[0xF], (a > b) as u8);
        }

        #[test]
        fn reverse_sub_sets_not_borrow_iff_less(a in any::<u8>(), b in any::<u8>()) {
            let mut emulator = with_registers(1, a, 2, b);
            emulator.execute(Instruction::ReverseSubWithBorrow(Reg(1), Reg(2))).unwrap();
            prop_assert_eq!(emulator.registers[1], b.wrapping_sub(a));
            prop_assert_eq!(emulator.registers[0xF], (b > a) as u8);
        }

        #[test]
        fn shifts_move_the_outgoing_bit_into_vf(a in any::<u8>()) {
            let mut emulator = with_registers(1, a, 0, 0);
            emulator.execute(Instruction::ShiftRight(Reg(1))).unwrap();
            prop_assert_eq!(emulator.registers[1], a >> 1);
            prop_assert_eq!(emulator.registers[0xF], a & 1);

            let mut emulator = with_registers(1, a, 0, 0);
            emulator.execute(Instruction::ShiftLeft(Reg(1))).unwrap();
            prop_assert_eq!(emulator.registers[1], a << 1);
            prop_assert_eq!(emulator.registers[0xF], a >> 7);
        }
    }

    #[test]
    fn shift_left_flag_is_zero_or_one() {
        let mut emulator = with_registers(1, 0x80, 0, 0);
        emulator.execute(Instruction::ShiftLeft(Reg(1))).unwrap();
        assert_eq!(emulator.registers[0xF], 1);
        assert_eq!(emulator.registers[1], 0);
    }

    #[test_case(Instruction::AddRegWithCarry(Reg(0xF), Reg(1)), 200 => 44 ; "add")]
    #[test_case(Instruction::SubRegWithBorrow(Reg(0xF), Reg(1)), 200 => 100 ; "sub")]
    #[test_case(Instruction::ReverseSubWithBorrow(Reg(0xF), Reg(1)), 200 => 156 ; "reverse sub")]
    #[test_case(Instruction::ShiftRight(Reg(0xF)), 0x81 => 0x40 ; "shift right")]
    #[test_case(Instruction::ShiftLeft(Reg(0xF)), 0x81 => 0x02 ; "shift left")]
    fn result_wins_over_flag_when_target_is_vf(instruction: Instruction, vf: u8) -> u8 {
        let mut emulator = with_registers(0xF, vf, 1, 100);
        emulator.execute(instruction).unwrap();
        emulator.registers[0xF]
    }

    #[test]
    fn indirect_jump_adds_v0() {
        let mut emulator = with_registers(0, 0x10, 1, 0);
        emulator.execute(Instruction::JumpV0PlusAddr(Addr(0x300))).unwrap();
        assert_eq!(emulator.program_counter, 0x310);
    }

    #[test]
    fn random_is_masked() {
        let mut emulator = Emulator::with_config(Config::default().with_seed(1), Mute);
        for _ in 0..64 {
            emulator.execute(Instruction::SetRegToRandom(Reg(4), Const(0x0F))).unwrap();
            assert_eq!(emulator.registers[4] & 0xF0, 0);
        }
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let run = || {
            let mut emulator = Emulator::with_config(Config::default().with_seed(99), Mute);
            (0..8)
                .map(|_| {
                    emulator.execute(Instruction::SetRegToRandom(Reg(0), Const(0xFF))).unwrap();
                    emulator.registers[0]
                })
                .collect::<Vec<u8>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn bcd_stores_hundreds_tens_ones() {
        let mut emulator = with_registers(2, 234, 0, 0);
        emulator.i = 0x300;
        emulator.execute(Instruction::StoreBcd(Reg(2))).unwrap();
        assert_eq!(&emulator.memory[0x300..0x303], &[2, 3, 4]);
    }

    #[test]
    fn bcd_past_end_of_memory_faults_without_writing() {
        let mut emulator = with_registers(2, 255, 0, 0);
        emulator.i = 0xFFE;
        assert_eq!(
            emulator.execute(Instruction::StoreBcd(Reg(2))),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(&emulator.memory[0xFFE..], &[0, 0]);
    }

    #[test]
    fn dump_and_load_are_inclusive() {
        let mut emulator = Emulator::new();
        emulator.registers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        emulator.i = 0x400;
        emulator.execute(Instruction::RegDump(Reg(3))).unwrap();
        assert_eq!(&emulator.memory[0x400..0x405], &[1, 2, 3, 4, 0]);

        emulator.memory[0x500..0x503].copy_from_slice(&[0xA, 0xB, 0xC]);
        emulator.i = 0x500;
        emulator.execute(Instruction::RegLoad(Reg(1))).unwrap();
        assert_eq!(&emulator.registers[..3], &[0xA, 0xB, 3]);
    }

    #[test]
    fn dump_and_load_past_end_of_memory_fault_without_effect() {
        let mut emulator = Emulator::new();
        emulator.registers = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        emulator.i = 0xFFE;
        assert_eq!(
            emulator.execute(Instruction::RegDump(Reg(3))),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(&emulator.memory[0xFFE..], &[0, 0]);

        emulator.memory[0xFFE..].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(
            emulator.execute(Instruction::RegLoad(Reg(3))),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(&emulator.registers[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn glyph_address_has_a_stride_of_five() {
        let mut emulator = with_registers(6, 0xA, 0, 0);
        emulator.execute(Instruction::SetIToGlyph(Reg(6))).unwrap();
        assert_eq!(emulator.i, 50);
        assert_eq!(&emulator.memory[50..55], &[0xF0, 0x90, 0xF0, 0x90, 0x90]);
    }

    #[test]
    fn add_to_i_wraps() {
        let mut emulator = with_registers(1, 2, 0, 0);
        emulator.i = 0xFFFF;
        emulator.execute(Instruction::AddRegToI(Reg(1))).unwrap();
        assert_eq!(emulator.i, 1);
    }

    #[test]
    fn clear_screen_clears_and_signals_redraw() {
        let mut emulator = Emulator::new();
        emulator.screen.flip(0, 0);
        emulator.execute(Instruction::ClearScreen).unwrap();
        assert_eq!(emulator.pixel(0, 0), Some(0));
        assert!(emulator.take_redraw());
        assert!(!emulator.take_redraw());
    }

    #[test]
    fn draw_on_blank_screen_has_no_collision() {
        let mut emulator = with_registers(0, 10, 1, 5);
        emulator.memory[0x300] = 0b1010_0000;
        emulator.i = 0x300;
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        assert_eq!(emulator.pixel(10, 5), Some(1));
        assert_eq!(emulator.pixel(11, 5), Some(0));
        assert_eq!(emulator.pixel(12, 5), Some(1));
        assert_eq!(emulator.registers[0xF], 0);
        assert!(emulator.needs_redraw());
    }

    #[test]
    fn drawing_twice_restores_the_screen_and_collides() {
        let mut emulator = with_registers(0, 20, 1, 7);
        emulator.i = 5 * 8; // glyph "8"
        let before = emulator.screen().clone();

        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(5))).unwrap();
        assert_eq!(emulator.registers[0xF], 0);
        assert_ne!(emulator.screen(), &before);

        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(5))).unwrap();
        assert_eq!(emulator.registers[0xF], 1);
        assert_eq!(emulator.screen(), &before);
    }

    #[test]
    fn collision_is_not_reset_by_later_pixels() {
        let mut emulator = with_registers(0, 0, 1, 0);
        emulator.screen.flip(0, 0);
        emulator.memory[0x300..0x302].copy_from_slice(&[0b1000_0000, 0b1111_1111]);
        emulator.i = 0x300;
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(2))).unwrap();
        assert_eq!(emulator.registers[0xF], 1);
    }

    #[test]
    fn sprites_wrap_each_axis() {
        let mut emulator = with_registers(0, 60, 1, 30);
        emulator.memory[0x300..0x305].copy_from_slice(&[0xFF; 5]);
        emulator.i = 0x300;
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(5))).unwrap();

        let columns = [60, 61, 62, 63, 0, 1, 2, 3];
        let rows = [30, 31, 0, 1, 2];
        for y in 0..32 {
            for x in 0..64 {
                let expected = (columns.contains(&x) && rows.contains(&y)) as u8;
                assert_eq!(emulator.pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
            }
        }
        assert_eq!(emulator.screen().lit_pixels(), 40);
    }

    #[test]
    fn sprite_origin_is_taken_modulo_the_screen() {
        let mut emulator = with_registers(0, 64 + 3, 1, 32 + 4);
        emulator.memory[0x300] = 0x80;
        emulator.i = 0x300;
        emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        assert_eq!(emulator.pixel(3, 4), Some(1));
    }

    #[test]
    fn sprite_past_end_of_memory_faults() {
        let mut emulator = Emulator::new();
        emulator.i = 0xFFE;
        assert_eq!(
            emulator.execute(Instruction::Draw(Reg(0), Reg(1), Const(3))),
            Err(Fault::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(emulator.screen().lit_pixels(), 0);
    }

    #[test]
    fn key_skips_look_at_the_keypad() {
        let mut emulator = with_registers(1, 0xB, 0, 0);
        emulator.execute(Instruction::IfKeyPressed(Reg(1))).unwrap();
        assert_eq!(emulator.program_counter, 0x200);
        emulator.execute(Instruction::IfKeyNotPressed(Reg(1))).unwrap();
        assert_eq!(emulator.program_counter, 0x202);

        emulator.set_key(key(0xB));
        emulator.execute(Instruction::IfKeyPressed(Reg(1))).unwrap();
        assert_eq!(emulator.program_counter, 0x204);
        emulator.execute(Instruction::IfKeyNotPressed(Reg(1))).unwrap();
        assert_eq!(emulator.program_counter, 0x204);

        emulator.clear_key(key(0xB));
        assert!(!emulator.is_pressed(key(0xB)));
    }

    #[test]
    fn wait_for_key_resumes_without_fetching() {
        let mut emulator = Emulator::new();
        emulator.load(&[0xF3, 0x0A, 0x60, 0x99]).unwrap(); // LD V3, K ; LD V0, 0x99
        emulator.step().unwrap();
        assert!(emulator.is_waiting_for_key());
        assert_eq!(emulator.program_counter, 0x202);

        emulator.step().unwrap();
        assert!(emulator.is_waiting_for_key());

        emulator.set_key(key(7));
        emulator.step().unwrap();
        assert_eq!(emulator.registers[3], 7);
        assert_eq!(emulator.state(), State::Running);
        assert_eq!(emulator.program_counter, 0x202);
        assert_eq!(emulator.registers[0], 0);

        emulator.step().unwrap();
        assert_eq!(emulator.registers[0], 0x99);
    }

    #[test]
    fn wait_for_key_prefers_the_highest_key() {
        let mut emulator = Emulator::new();
        emulator.execute(Instruction::WaitForKey(Reg(5))).unwrap();
        emulator.set_key(key(2));
        emulator.set_key(key(9));
        emulator.step().unwrap();
        assert_eq!(emulator.registers[5], 9);
    }

    #[test]
    fn timers_do_not_tick_while_waiting() {
        let mut emulator = Emulator::new();
        emulator.delay_timer = 10;
        emulator.execute(Instruction::WaitForKey(Reg(0))).unwrap();
        emulator.step().unwrap();
        emulator.step().unwrap();
        assert_eq!(emulator.delay_timer(), 10);
    }

    #[test]
    fn delay_timer_counts_down_once_per_step() {
        let mut emulator = with_registers(1, 3, 0, 0);
        emulator.execute(Instruction::SetDelayTimerToReg(Reg(1))).unwrap();
        emulator.step().unwrap();
        assert_eq!(emulator.delay_timer(), 2);
        emulator.step().unwrap();
        emulator.step().unwrap();
        emulator.step().unwrap();
        assert_eq!(emulator.delay_timer(), 0);
        emulator.execute(Instruction::SetRegToDelayTimer(Reg(2))).unwrap();
        assert_eq!(emulator.registers[2], 0);
    }

    #[test]
    fn sound_timer_of_one_beeps_on_the_next_step() {
        let beeps = Cell::new(0);
        let mut emulator = Emulator::with_speaker(|| beeps.set(beeps.get() + 1));
        emulator.sound_timer = 1;
        emulator.step().unwrap();
        assert_eq!(beeps.get(), 1);
        assert_eq!(emulator.sound_timer(), 0);
        emulator.step().unwrap();
        assert_eq!(beeps.get(), 1);
    }

    #[test]
    fn sound_timer_of_five_beeps_once_on_the_fifth_step() {
        let beeps = Cell::new(0);
        let mut emulator = Emulator::with_speaker(|| beeps.set(beeps.get() + 1));
        emulator.sound_timer = 5;
        for _ in 0..4 {
            emulator.step().unwrap();
            assert_eq!(beeps.get(), 0);
        }
        emulator.step().unwrap();
        assert_eq!(beeps.get(), 1);
    }

    #[test]
    fn unknown_opcodes_are_ignored_by_default() {
        let mut emulator = Emulator::new();
        emulator.load(&[0x01, 0x23]).unwrap();
        emulator.step().unwrap();
        assert_eq!(emulator.program_counter(), 0x202);
    }

    #[test]
    fn unknown_opcodes_fault_when_strict() {
        let mut emulator = Emulator::with_config(Config::default().strict(), Mute);
        emulator.load(&[0x01, 0x23]).unwrap();
        assert_eq!(emulator.step(), Err(Fault::UnknownOpcode { opcode: 0x0123, pc: 0x200 }));
    }

    #[test]
    fn faulting_step_does_not_tick_timers() {
        let mut emulator = Emulator::new();
        emulator.delay_timer = 4;
        emulator.load(&[0x00, 0xEE]).unwrap();
        assert_eq!(emulator.step(), Err(Fault::StackUnderflow { pc: 0x200 }));
        assert_eq!(emulator.delay_timer(), 4);
    }

    #[test]
    fn fetch_past_end_of_memory_faults() {
        let mut emulator = Emulator::new();
        emulator.execute(Instruction::Goto(Addr(0xFFF))).unwrap();
        assert_eq!(emulator.step(), Err(Fault::MemoryOutOfBounds { address: 0x1000 }));
    }

    #[test]
    fn jump_targets_stay_within_twelve_bits() {
        let mut emulator = Emulator::new();
        emulator.execute(Instruction::Goto(Addr(0xFFFF))).unwrap();
        assert_eq!(emulator.program_counter, 0x0FFF);
        emulator.execute(Instruction::IfRegEqConst(Reg(0), Const(0))).unwrap();
        assert_eq!(emulator.program_counter, 0x1001);
        assert_eq!(emulator.step(), Err(Fault::MemoryOutOfBounds { address: 0x1001 }));

        let mut emulator = with_registers(0, 1, 1, 0);
        emulator.execute(Instruction::JumpV0PlusAddr(Addr(0xFFFF))).unwrap();
        assert_eq!(emulator.program_counter, 0x1000);
        assert_eq!(emulator.step(), Err(Fault::MemoryOutOfBounds { address: 0x1000 }));

        let mut emulator = Emulator::new();
        emulator.execute(Instruction::Call(Addr(0xF300))).unwrap();
        assert_eq!(emulator.program_counter, 0x300);
    }

    #[test]
    fn skip_wraps_the_program_counter() {
        let mut emulator = Emulator::new();
        emulator.program_counter = 0xFFFE;
        emulator.execute(Instruction::IfRegEqConst(Reg(0), Const(0))).unwrap();
        assert_eq!(emulator.program_counter, 0);
    }

    #[test]
    fn instances_are_independent() {
        let mut first = Emulator::new();
        let second = Emulator::new();
        first.execute(Instruction::SetRegToConst(Reg(0), Const(1))).unwrap();
        assert_eq!(second.registers()[0], 0);
    }
}
