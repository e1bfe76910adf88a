/// Hex keypad state plus the latch used by FX0A.
///
/// FX0A never blocks: while `waiting` is set the instruction keeps
/// rewinding PC, and the next key released during that time is latched
/// into `key_released` for the instruction to pick up.
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: [bool; 16],
    pub key_released: Option<u8>,
    pub waiting: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
        self.key_released = None;
        self.waiting = false;
    }

    pub fn press(&mut self, key: u8) {
        match self.keys.get_mut(key as usize) {
            Some(state) => *state = true,
            None => log::warn!("ignoring press of unknown key {key:#X}"),
        }
    }

    pub fn release(&mut self, key: u8) {
        match self.keys.get_mut(key as usize) {
            Some(state) => {
                *state = false;
                if self.waiting {
                    self.key_released = Some(key);
                }
            }
            None => log::warn!("ignoring release of unknown key {key:#X}"),
        }
    }

    /// Keys outside 0x0..=0xF are never pressed.
    pub fn get_key_status_from_num(&self, n: u8) -> Option<bool> {
        self.keys.get(n as usize).copied()
    }

    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }
}

#[cfg(feature = "frontend")]
pub fn key_to_num(key: minifb::Key) -> Option<u8> {
    use minifb::Key;

    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
