use std::{fs, path::Path};

use crate::{
    config::Config,
    decode::Instruction,
    dispatch::Opcode,
    display::FrameBuffer,
    error::{Chip8Error, Result},
    machine::{Machine, Signal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No program yet; `cycle` refuses to run.
    Idle,
    Running,
}

/// Owns the machine and drives it one instruction at a time.
///
/// The host calls [`Emulator::cycle`] at the CPU rate and
/// [`Emulator::update_timers`] at 60 Hz, and reads the frame buffer in
/// between.
pub struct Emulator {
    pub machine: Machine,
    state: State,
}

impl Emulator {
    pub fn new(config: Config) -> Self {
        Self::with_machine(Machine::new(config))
    }

    /// Deterministic random numbers, for tests and replays.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_machine(Machine::with_seed(config, seed))
    }

    fn with_machine(machine: Machine) -> Self {
        Self {
            machine,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let program = fs::read(path).map_err(|source| Chip8Error::RomRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading rom from {} ({} bytes)", path.display(), program.len());
        self.load_rom_bytes(&program)
    }

    pub fn load_rom_bytes(&mut self, program: &[u8]) -> Result<()> {
        self.machine.load_program(program)?;
        self.state = State::Running;
        Ok(())
    }

    pub fn set_callback(&mut self, callback: impl FnMut(Signal) + 'static) {
        self.machine.set_callback(callback);
    }

    /// The instruction `cycle` would execute next.
    pub fn peek_instruction(&self) -> Result<Instruction> {
        self.machine.mem.instruction_at(self.machine.mem.pc.0)
    }

    pub fn fetch_decode(&mut self) -> Result<(Instruction, &'static Opcode)> {
        let address = self.machine.mem.pc.0;
        let ins = self.machine.mem.next_instruction()?;
        match Opcode::lookup(ins) {
            Some(op) => {
                log::trace!("{address:03X}: {ins} {}", op.mnemonic);
                Ok((ins, op))
            }
            None => {
                log::error!("invalid (or unimplemented) instruction {ins} at {address:03X}");
                Err(Chip8Error::InvalidOpcode {
                    opcode: ins.raw(),
                    address,
                })
            }
        }
    }

    /// Fetch, step PC, execute. On an invalid opcode PC is already past it,
    /// so the caller may either stop or keep cycling to skip it.
    pub fn cycle(&mut self) -> Result<()> {
        if self.state == State::Idle {
            return Err(Chip8Error::NoRomLoaded);
        }
        let (ins, op) = self.fetch_decode()?;
        (op.execute)(&mut self.machine, ins)
    }

    /// One 60 Hz tick. Returns whether the buzzer should sound.
    pub fn update_timers(&mut self) -> bool {
        self.machine.delay_timer.tick();
        self.machine.sound_timer.tick();
        self.machine.vblank = true;
        self.sound_active()
    }

    pub fn sound_active(&self) -> bool {
        self.machine.sound_timer.is_active()
    }

    pub fn display(&self) -> &FrameBuffer {
        &self.machine.fb
    }

    pub fn key_down(&mut self, key: u8) {
        self.machine.keyboard.press(key);
    }

    pub fn key_up(&mut self, key: u8) {
        self.machine.keyboard.release(key);
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
