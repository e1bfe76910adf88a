//! Opcode decode table.
//!
//! CHIP-8 opcodes are told apart by different nibbles depending on the
//! family: some only by the high nibble, others also by the low nibble, the
//! low byte, or (00CN) the third nibble. Each entry carries the mask that
//! selects the identifying bits and the value those bits must have.

use crate::{decode::Instruction, error::Result, handlers as h, machine::Machine};

pub type Handler = fn(&mut Machine, Instruction) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Opcode {
    pub mask: u16,
    pub value: u16,
    pub mnemonic: &'static str,
    pub execute: Handler,
}

const HIGH_NIBBLE_MASK: u16 = 0xF000;
const HIGH_AND_LOW_NIBBLE_MASK: u16 = 0xF00F;
const HIGH_NIBBLE_AND_LOW_BYTE_MASK: u16 = 0xF0FF;
const HIGH_NIBBLE_AND_THIRD_NIBBLE_MASK: u16 = 0xF0F0;

impl Opcode {
    const fn new(mask: u16, high: u8, low: u8, mnemonic: &'static str, execute: Handler) -> Self {
        Self {
            mask,
            value: ((high as u16) << 12) | low as u16,
            mnemonic,
            execute,
        }
    }

    /// Identified by the high nibble alone.
    const fn standard(high: u8, mnemonic: &'static str, execute: Handler) -> Self {
        Self::new(HIGH_NIBBLE_MASK, high, 0x00, mnemonic, execute)
    }

    const fn low_nibble(high: u8, low: u8, mnemonic: &'static str, execute: Handler) -> Self {
        Self::new(HIGH_AND_LOW_NIBBLE_MASK, high, low, mnemonic, execute)
    }

    const fn low_byte(high: u8, low: u8, mnemonic: &'static str, execute: Handler) -> Self {
        Self::new(HIGH_NIBBLE_AND_LOW_BYTE_MASK, high, low, mnemonic, execute)
    }

    const fn third_nibble(high: u8, third: u8, mnemonic: &'static str, execute: Handler) -> Self {
        Self::new(HIGH_NIBBLE_AND_THIRD_NIBBLE_MASK, high, third << 4, mnemonic, execute)
    }

    pub fn matches(&self, ins: Instruction) -> bool {
        (ins.raw() & self.mask) == self.value
    }

    /// First table entry matching `ins`.
    pub fn lookup(ins: Instruction) -> Option<&'static Opcode> {
        DECODE_TABLE.iter().find(|op| op.matches(ins))
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opcode")
            .field("mask", &format_args!("{:#06X}", self.mask))
            .field("value", &format_args!("{:#06X}", self.value))
            .field("mnemonic", &self.mnemonic)
            .finish()
    }
}

pub static DECODE_TABLE: [Opcode; 41] = [
    Opcode::third_nibble(0x0, 0xC, "scd", h::sc_down),
    Opcode::low_byte(0x0, 0xE0, "cls", h::cls),
    Opcode::low_byte(0x0, 0xEE, "ret", h::ret),
    Opcode::low_byte(0x0, 0xFB, "scr", h::sc_right),
    Opcode::low_byte(0x0, 0xFC, "scl", h::sc_left),
    Opcode::low_byte(0x0, 0xFD, "exit", h::exit),
    Opcode::low_byte(0x0, 0xFE, "low", h::lores),
    Opcode::low_byte(0x0, 0xFF, "high", h::hires),
    Opcode::standard(0x1, "jp nnn", h::jmp),
    Opcode::standard(0x2, "call nnn", h::call),
    Opcode::standard(0x3, "se vx, nn", h::seq_vx_nn),
    Opcode::standard(0x4, "sne vx, nn", h::sne_vx_nn),
    Opcode::standard(0x5, "se vx, vy", h::seq_vx_vy),
    Opcode::standard(0x6, "ld vx, nn", h::mov_vx_nn),
    Opcode::standard(0x7, "add vx, nn", h::add_vx_nn),
    Opcode::low_nibble(0x8, 0x0, "ld vx, vy", h::mov_vx_vy),
    Opcode::low_nibble(0x8, 0x1, "or vx, vy", h::or_vx_vy),
    Opcode::low_nibble(0x8, 0x2, "and vx, vy", h::and_vx_vy),
    Opcode::low_nibble(0x8, 0x3, "xor vx, vy", h::xor_vx_vy),
    Opcode::low_nibble(0x8, 0x4, "add vx, vy", h::add_vx_vy),
    Opcode::low_nibble(0x8, 0x5, "sub vx, vy", h::sub_vx_vy),
    Opcode::low_nibble(0x8, 0x6, "shr vx, vy", h::shr_vx_vy),
    Opcode::low_nibble(0x8, 0x7, "subn vx, vy", h::rsb_vx_vy),
    Opcode::low_nibble(0x8, 0xE, "shl vx, vy", h::shl_vx_vy),
    Opcode::standard(0x9, "sne vx, vy", h::sne_vx_vy),
    Opcode::standard(0xA, "ld i, nnn", h::mov_i_nnn),
    Opcode::standard(0xB, "jp v0, nnn", h::jmp_vx_nnn),
    Opcode::standard(0xC, "rnd vx, nn", h::rnd_vx_nn),
    Opcode::standard(0xD, "drw vx, vy, n", h::drw),
    Opcode::low_byte(0xE, 0x9E, "skp vx", h::spr_vx),
    Opcode::low_byte(0xE, 0xA1, "sknp vx", h::sup_vx),
    Opcode::low_byte(0xF, 0x07, "ld vx, dt", h::mov_vx_dt),
    Opcode::low_byte(0xF, 0x0A, "ld vx, k", h::wait_mov_vx_key),
    Opcode::low_byte(0xF, 0x15, "ld dt, vx", h::mov_dt_vx),
    Opcode::low_byte(0xF, 0x18, "ld st, vx", h::mov_st_vx),
    Opcode::low_byte(0xF, 0x1E, "add i, vx", h::add_i_vx),
    Opcode::low_byte(0xF, 0x29, "ld f, vx", h::mov_i_font_vx),
    Opcode::low_byte(0xF, 0x30, "ld hf, vx", h::mov_i_bfont_vx),
    Opcode::low_byte(0xF, 0x33, "ld b, vx", h::mov_i_bcd_vx),
    Opcode::low_byte(0xF, 0x55, "ld [i], vx", h::mov_i_vx),
    Opcode::low_byte(0xF, 0x65, "ld vx, [i]", h::mov_vx_i),
];
