use crate::memory::TypeAddr;

/// VF doubles as carry/borrow/collision output.
pub const FLAG_REGISTER: u8 = 0xF;

#[derive(Debug, Default)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    // reg_num is always a decoded nibble
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG_REGISTER, set as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG_REGISTER)
    }

    /// V0..=VX
    pub fn up_to(&self, reg_num: u8) -> &[u8] {
        &self.registers[..=(reg_num & 0xF) as usize]
    }

    pub fn up_to_mut(&mut self, reg_num: u8) -> &mut [u8] {
        &mut self.registers[..=(reg_num & 0xF) as usize]
    }
}

// Special registers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    /// Step over one instruction.
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn advance(&mut self, by: TypeAddr) {
        self.0 = self.0.wrapping_add(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps() {
        let mut regs = Registers::new();
        regs.set_register(0x3, 0xF0);
        regs.add_to_register(0x3, 0x20);
        assert_eq!(regs.get(0x3), 0x10);
    }

    #[test]
    fn test_flag() {
        let mut regs = Registers::new();
        regs.set_flag(true);
        assert_eq!(regs.flag(), 1);
        assert_eq!(regs.get(FLAG_REGISTER), 1);
        regs.set_flag(false);
        assert_eq!(regs.flag(), 0);
    }

    #[test]
    fn test_register_ranges() {
        let mut regs = Registers::new();
        regs.up_to_mut(2).copy_from_slice(&[1, 2, 3]);
        assert_eq!(regs.up_to(2), &[1, 2, 3]);
        assert_eq!(regs.up_to(0xF).len(), 16);
    }

    #[test]
    fn test_pc_steps() {
        let mut pc = ProgramCounter(0x200);
        pc.increment();
        assert_eq!(pc.0, 0x202);
        pc.decrement();
        pc.decrement();
        assert_eq!(pc.0, 0x1FE);
    }
}
