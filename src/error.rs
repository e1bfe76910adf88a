use std::{io, path::PathBuf};

use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can go wrong while loading or running a program.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("failed to read ROM `{}`", path.display())]
    RomRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("no ROM loaded")]
    NoRomLoaded,

    #[error("invalid or unimplemented instruction {opcode:#06X} at {address:#05X}")]
    InvalidOpcode { opcode: u16, address: TypeAddr },

    #[error("memory access of {len} byte(s) at {address:#05X} runs past the end of memory")]
    MemoryOutOfBounds { address: usize, len: usize },

    #[error("return with an empty call stack at {address:#05X}")]
    StackUnderflow { address: TypeAddr },

    #[error("call stack overflow at {address:#05X}")]
    StackOverflow { address: TypeAddr },
}

impl Chip8Error {
    /// Faults caused by the program itself rather than by the host.
    pub fn is_program_fault(&self) -> bool {
        !matches!(self, Self::RomRead { .. } | Self::RomTooLarge { .. } | Self::NoRomLoaded)
    }
}
