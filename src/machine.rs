use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::Config, display::FrameBuffer, error::Result, keyboard::Keyboard, memory::Memory,
    registers::Registers, timer::Timer,
};

/// Requests sent to the host by the SUPER-CHIP mode control opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Exit,
    Lores,
    Hires,
}

pub type Callback = Box<dyn FnMut(Signal)>;

/// All mutable machine state. Handlers operate on this and nothing else.
pub struct Machine {
    pub regs: Registers,
    pub mem: Memory,
    pub fb: FrameBuffer,
    pub keyboard: Keyboard,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    pub config: Config,
    /// A vertical blank happened since the last sprite draw.
    pub vblank: bool,
    rng: StdRng,
    callback: Option<Callback>,
}

impl Machine {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            fb: FrameBuffer::new(config.max_pixels()),
            keyboard: Keyboard::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            config,
            vblank: true,
            rng,
            callback: None,
        }
    }

    /// Power-cycle everything a program can touch and place `program` at
    /// 0x200. Config, RNG and callback carry over. Nothing changes if the
    /// program does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let mut mem = Memory::new();
        mem.load_rom(program)?;
        self.mem = mem;
        self.regs = Registers::new();
        self.fb = FrameBuffer::new(self.config.max_pixels());
        self.keyboard.reset();
        self.delay_timer = Timer::new(0);
        self.sound_timer = Timer::new(0);
        self.vblank = true;
        Ok(())
    }

    pub fn set_callback(&mut self, callback: impl FnMut(Signal) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Hand `signal` to the host. Returns false when nobody is listening.
    pub fn notify(&mut self, signal: Signal) -> bool {
        match self.callback.as_mut() {
            Some(callback) => {
                callback(signal);
                true
            }
            None => {
                log::warn!("callback not set: {signal:?} instruction needs to modify window state");
                false
            }
        }
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_notify_without_callback() {
        let mut m = Machine::new(Config::default());
        assert!(!m.notify(Signal::Exit));
    }

    #[test]
    fn test_notify_with_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut m = Machine::new(Config::default());
        m.set_callback(move |s| sink.borrow_mut().push(s));
        assert!(m.notify(Signal::Hires));
        assert!(m.notify(Signal::Lores));
        assert_eq!(*seen.borrow(), vec![Signal::Hires, Signal::Lores]);

        m.clear_callback();
        assert!(!m.notify(Signal::Exit));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_load_program_keeps_callback_and_config() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut m = Machine::with_seed(Config::chip8(), 3);
        m.set_callback(move |s| sink.borrow_mut().push(s));
        m.vblank = false;
        m.sound_timer.set(4);

        m.load_program(&[0x00, 0xFD]).unwrap();
        assert!(m.vblank);
        assert!(!m.sound_timer.is_active());
        assert_eq!(m.config, Config::chip8());
        assert!(m.notify(Signal::Exit));
        assert_eq!(*seen.borrow(), vec![Signal::Exit]);
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let mut a = Machine::with_seed(Config::default(), 7);
        let mut b = Machine::with_seed(Config::default(), 7);
        let xs: Vec<u8> = (0..8).map(|_| a.random_byte()).collect();
        let ys: Vec<u8> = (0..8).map(|_| b.random_byte()).collect();
        assert_eq!(xs, ys);
    }
}
