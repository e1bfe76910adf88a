use crate::{
    decode::Instruction,
    error::{Chip8Error, Result},
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
/// Programs are loaded here; everything below belongs to the interpreter.
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
/// SUPER-CHIP allows 16 nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

const FONT_GLYPH_SIZE: usize = 5;
const BIG_FONT_GLYPH_SIZE: usize = 10;

pub const FONT: [u8; FONT_GLYPH_SIZE * 16] = [
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

pub const BIG_FONT: [u8; BIG_FONT_GLYPH_SIZE * 16] = [
    0xFF, 0xFF, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, // 0
    0x18, 0x78, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0xFF, 0xFF, // 1
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // 2
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 3
    0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0x03, 0x03, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 5
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 6
    0xFF, 0xFF, 0x03, 0x03, 0x06, 0x0C, 0x18, 0x18, 0x18, 0x18, // 7
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 8
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 9
    0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
    0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, // B
    0x3C, 0xFF, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xFF, 0x3C, // C
    0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // E
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xC0, 0xC0, // F
];

/// Address of the 5-byte glyph for the low nibble of `digit`.
pub fn font_addr(digit: u8) -> TypeAddr {
    ((digit & 0xF) as usize * FONT_GLYPH_SIZE) as TypeAddr
}

/// Address of the 10-byte glyph, stored right after the small font.
pub fn big_font_addr(digit: u8) -> TypeAddr {
    (FONT.len() + (digit & 0xF) as usize * BIG_FONT_GLYPH_SIZE) as TypeAddr
}

pub struct Memory {
    // 4k bytes
    // small font at 000 -> 04F, big font at 050 -> 0EF, programs from 200
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        bytes[FONT.len()..FONT.len() + BIG_FONT.len()].copy_from_slice(&BIG_FONT);

        Self {
            bytes,
            pc: ProgramCounter(0),
            index: IndexRegister(0),
            stack: Stack::new(),
        }
    }

    fn range(addr: usize, len: usize) -> Result<std::ops::Range<usize>> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds { address: addr, len });
        }
        Ok(addr..end)
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        let range = Self::range(addr as usize, 1)?;
        self.bytes[range.start] = val;
        Ok(())
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8> {
        let range = Self::range(addr as usize, 1)?;
        Ok(self.bytes[range.start])
    }

    /// Bounds-checked view of `len` bytes from `addr`.
    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        let range = Self::range(addr as usize, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, addr: TypeAddr, len: usize) -> Result<&mut [u8]> {
        let range = Self::range(addr as usize, len)?;
        Ok(&mut self.bytes[range])
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn instruction_at(&self, addr: TypeAddr) -> Result<Instruction> {
        let word = self.slice(addr, 2)?;
        Ok(Instruction::from_bytes(word[0], word[1]))
    }

    /// Fetch the instruction at PC and step past it.
    pub fn next_instruction(&mut self) -> Result<Instruction> {
        let ins = self.instruction_at(self.pc.0)?;
        self.increment_pc();
        Ok(ins)
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    /// Place a program at 0x200 and point PC at it. Nothing changes if the
    /// program does not fit.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..].fill(0);
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        self.set_pc(PROGRAM_START);
        log::debug!(
            "program placed at {:#05X}..{:#05X}",
            start_index,
            start_index + bytes.len()
        );
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_DEPTH),
        }
    }

    pub fn is_full(&self) -> bool {
        self.addresses.len() >= STACK_DEPTH
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn push(&mut self, addr: TypeAddr) {
        self.addresses.push(addr)
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_layout() {
        let m = Memory::new();
        assert_eq!(m.slice(0, 5).unwrap(), &FONT[..5]);
        assert_eq!(m.slice(0x50, 10).unwrap(), &BIG_FONT[..10]);
        // NB. memory is zeroed from 0xF0 because before that we bake in the fonts
        assert!(m.bytes()[0xF0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_font_addresses() {
        assert_eq!(font_addr(0x0), 0x00);
        assert_eq!(font_addr(0xA), 50);
        assert_eq!(font_addr(0x1A), 50);
        assert_eq!(big_font_addr(0x0), 0x50);
        assert_eq!(big_font_addr(0x2), 0x50 + 20);
    }

    #[test]
    fn test_load_rom_at_program_start() {
        let mut m = Memory::new();
        m.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(m.slice(0x200, 4).unwrap(), &[0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(m.pc.0, PROGRAM_START);
    }

    #[test]
    fn test_reload_clears_old_program() {
        let mut m = Memory::new();
        m.load_rom(&[0xAA; 8]).unwrap();
        m.load_rom(&[0xBB; 2]).unwrap();
        assert_eq!(m.slice(0x200, 4).unwrap(), &[0xBB, 0xBB, 0, 0]);
    }

    #[test]
    fn test_rom_too_large_is_rejected() {
        let mut m = Memory::new();
        m.set_pc(0x300);
        let rom = vec![0xFF; MAX_ROM_SIZE + 1];
        assert!(matches!(
            m.load_rom(&rom),
            Err(Chip8Error::RomTooLarge { size, max }) if size == 3585 && max == 3584
        ));
        assert_eq!(m.pc.0, 0x300);
        assert_eq!(m.get(0x200).unwrap(), 0);
        // exactly full is fine
        m.load_rom(&rom[1..]).unwrap();
        assert_eq!(m.get(0xFFF).unwrap(), 0xFF);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut m = Memory::new();
        assert!(matches!(
            m.get(0x1000),
            Err(Chip8Error::MemoryOutOfBounds { address: 0x1000, len: 1 })
        ));
        assert!(matches!(
            m.slice(0xFFE, 3),
            Err(Chip8Error::MemoryOutOfBounds { address: 0xFFE, len: 3 })
        ));
        assert!(m.set(0xFFFF, 1).is_err());
        assert!(m.slice_mut(0xFFD, 3).is_ok());
    }

    #[test]
    fn test_next_instruction() {
        let mut m = Memory::new();
        m.load_rom(&[0xA2, 0x2A]).unwrap();
        let ins = m.next_instruction().unwrap();
        assert_eq!(ins, 0xA22A);
        assert_eq!(m.pc.0, 0x202);

        m.set_pc(0xFFF);
        assert!(m.next_instruction().is_err());
        assert_eq!(m.pc.0, 0xFFF);
    }

    #[test]
    fn test_stack() {
        let mut s = Stack::new();
        assert!(s.pop().is_none());
        for addr in 0..STACK_DEPTH as TypeAddr {
            s.push(addr);
        }
        assert!(s.is_full());
        assert_eq!(s.pop(), Some(15));
        assert_eq!(s.len(), 15);
    }
}
