use std::fmt;

use crate::memory::TypeAddr;

/// A raw 2-byte opcode, big-endian in memory.
///
/// Any 16-bit value decodes; whether it means anything is decided by the
/// dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    code: u16,
}

impl Instruction {
    pub fn new(code: u16) -> Self {
        Instruction { code }
    }

    pub fn from_bytes(high: u8, low: u8) -> Self {
        Self::new(((high as u16) << 8) | low as u16)
    }

    // n is starting digit (1-based), m is length; the digits must fit in
    // the word
    fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        debug_assert!(n >= 1 && m >= 1 && n + m <= 5, "digits {n}+{m} out of range");
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (((self.code as u32) >> shift_places) & mask) as u16
    }

    pub fn raw(&self) -> u16 {
        self.code
    }

    pub fn opcode(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl From<u16> for Instruction {
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

impl PartialEq<u16> for Instruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.code)
    }
}

#[test]
fn test_bit_manip() {
    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
    assert_eq!(Instruction::new(0xFFFF).nth_m_digits(1, 4), 0xFFFF);
    assert_eq!(Instruction::new(0x4CEE).nth_m_digits(4, 1), 0xE);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn test_bit_manip_past_last_digit() {
    Instruction::new(0x4CEE).nth_m_digits(3, 3);
}

#[test]
fn test_fields() {
    let ins = Instruction::from_bytes(0xD1, 0x2F);
    assert_eq!(ins, 0xD12F);
    assert_eq!(ins.opcode(), 0xD);
    assert_eq!(ins.x(), 0x1);
    assert_eq!(ins.y(), 0x2);
    assert_eq!(ins.n(), 0xF);
    assert_eq!(ins.nn(), 0x2F);
    assert_eq!(ins.nnn(), 0x12F);
    assert_eq!(ins.to_string(), "D12F");
}
