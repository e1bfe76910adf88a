// CHIP-8 / SUPER-CHIP virtual machine
//
// 16 8-bit data registers named V0 to VF, VF doubles as a flag
// I -> address register (12 bits)
// 4k of memory, fonts at the bottom, programs from 0x200
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep when sound timer is non-zero
//
// Display res: 64x32, or 128x64 once SUPER-CHIP switches to hires
//
// opcodes are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// The host drives everything: `cycle` at the CPU rate (~700-900 Hz),
// `update_timers` at 60 Hz, and it reads the frame buffer between frames.

pub mod config;
pub mod decode;
pub mod dispatch;
pub mod display;
pub mod emulator;
pub mod error;
pub mod handlers;
pub mod keyboard;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod timer;

#[cfg(feature = "frontend")]
pub mod sound;
#[cfg(feature = "frontend")]
pub mod window;

pub use config::{Config, Profile};
pub use decode::Instruction;
pub use display::FrameBuffer;
pub use emulator::{Emulator, State};
pub use error::{Chip8Error, Result};
pub use machine::{Machine, Signal};
