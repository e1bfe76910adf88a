//! One function per opcode family. Each runs after the driver has already
//! stepped PC past the instruction, so "skip" means one more step and the
//! instruction's own address is `pc - 2`.
//!
//! A handler either succeeds or fails before touching any state: memory
//! ranges are checked up front.

use crate::{
    decode::Instruction,
    display::{HIRES_HEIGHT, HIRES_WIDTH, LORES_HEIGHT, LORES_WIDTH},
    error::{Chip8Error, Result},
    machine::{Machine, Signal},
    memory::{big_font_addr, font_addr, TypeAddr},
};

fn current_address(m: &Machine) -> TypeAddr {
    m.mem.pc.0.wrapping_sub(2)
}

fn skip_if(m: &mut Machine, cond: bool) {
    if cond {
        m.mem.increment_pc();
    }
}

// 00CN
pub fn sc_down(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.fb.scroll_down(ins.n() as usize);
    Ok(())
}

// 00E0
pub fn cls(m: &mut Machine, _: Instruction) -> Result<()> {
    m.fb.clear_buffer();
    Ok(())
}

// 00EE
pub fn ret(m: &mut Machine, _: Instruction) -> Result<()> {
    let addr = m.mem.stack.pop().ok_or(Chip8Error::StackUnderflow {
        address: current_address(m),
    })?;
    m.mem.set_pc(addr);
    Ok(())
}

// 00FB
pub fn sc_right(m: &mut Machine, _: Instruction) -> Result<()> {
    m.fb.scroll_right();
    Ok(())
}

// 00FC
pub fn sc_left(m: &mut Machine, _: Instruction) -> Result<()> {
    m.fb.scroll_left();
    Ok(())
}

// 00FD
pub fn exit(m: &mut Machine, _: Instruction) -> Result<()> {
    m.notify(Signal::Exit);
    Ok(())
}

// 00FE
pub fn lores(m: &mut Machine, _: Instruction) -> Result<()> {
    m.notify(Signal::Lores);
    m.fb.resize(LORES_WIDTH, LORES_HEIGHT);
    log::debug!("switched to {LORES_WIDTH}x{LORES_HEIGHT}");
    Ok(())
}

// 00FF
pub fn hires(m: &mut Machine, _: Instruction) -> Result<()> {
    m.notify(Signal::Hires);
    m.fb.resize(HIRES_WIDTH, HIRES_HEIGHT);
    log::debug!("switched to {HIRES_WIDTH}x{HIRES_HEIGHT}");
    Ok(())
}

// 1NNN
pub fn jmp(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.mem.set_pc(ins.nnn());
    Ok(())
}

// 2NNN
pub fn call(m: &mut Machine, ins: Instruction) -> Result<()> {
    if m.mem.stack.is_full() {
        return Err(Chip8Error::StackOverflow {
            address: current_address(m),
        });
    }
    // store the next instruction to return back to
    m.mem.stack.push(m.mem.pc.0);
    m.mem.set_pc(ins.nnn());
    Ok(())
}

// 3XNN
pub fn seq_vx_nn(m: &mut Machine, ins: Instruction) -> Result<()> {
    let cond = m.regs.get(ins.x()) == ins.nn();
    skip_if(m, cond);
    Ok(())
}

// 4XNN
pub fn sne_vx_nn(m: &mut Machine, ins: Instruction) -> Result<()> {
    let cond = m.regs.get(ins.x()) != ins.nn();
    skip_if(m, cond);
    Ok(())
}

// 5XY0
pub fn seq_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    let cond = m.regs.get(ins.x()) == m.regs.get(ins.y());
    skip_if(m, cond);
    Ok(())
}

// 6XNN
pub fn mov_vx_nn(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.regs.set_register(ins.x(), ins.nn());
    Ok(())
}

// 7XNN, no carry flag
pub fn add_vx_nn(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.regs.add_to_register(ins.x(), ins.nn());
    Ok(())
}

// 8XY0
pub fn mov_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.regs.set_register(ins.x(), m.regs.get(ins.y()));
    Ok(())
}

// 8XY1..8XY3 reset VF on every interpreter we emulate
fn logic(m: &mut Machine, ins: Instruction, op: fn(u8, u8) -> u8) -> Result<()> {
    let value = op(m.regs.get(ins.x()), m.regs.get(ins.y()));
    m.regs.set_register(ins.x(), value);
    m.regs.set_flag(false);
    Ok(())
}

// 8XY1
pub fn or_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    logic(m, ins, |x, y| x | y)
}

// 8XY2
pub fn and_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    logic(m, ins, |x, y| x & y)
}

// 8XY3
pub fn xor_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    logic(m, ins, |x, y| x ^ y)
}

// 8XY4
pub fn add_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    let (x, y) = (m.regs.get(ins.x()), m.regs.get(ins.y()));
    let (sum, carry) = x.overflowing_add(y);
    m.regs.set_register(ins.x(), sum);
    m.regs.set_flag(carry);
    Ok(())
}

// 8XY5
pub fn sub_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    let (x, y) = (m.regs.get(ins.x()), m.regs.get(ins.y()));
    m.regs.set_register(ins.x(), x.wrapping_sub(y));
    m.regs.set_flag(x >= y); // no borrow
    Ok(())
}

// 8XY6
pub fn shr_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    if !m.config.shift_quirk {
        m.regs.set_register(ins.x(), m.regs.get(ins.y()));
    }
    let vx_value = m.regs.get(ins.x());
    m.regs.set_register(ins.x(), vx_value >> 1);
    m.regs.set_flag(vx_value & 1 == 1);
    Ok(())
}

// 8XY7
pub fn rsb_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    let (x, y) = (m.regs.get(ins.x()), m.regs.get(ins.y()));
    m.regs.set_register(ins.x(), y.wrapping_sub(x));
    m.regs.set_flag(y >= x); // no borrow
    Ok(())
}

// 8XYE
pub fn shl_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    if !m.config.shift_quirk {
        m.regs.set_register(ins.x(), m.regs.get(ins.y()));
    }
    let vx_value = m.regs.get(ins.x());
    m.regs.set_register(ins.x(), vx_value << 1);
    m.regs.set_flag(vx_value >> 7 == 1);
    Ok(())
}

// 9XY0
pub fn sne_vx_vy(m: &mut Machine, ins: Instruction) -> Result<()> {
    let cond = m.regs.get(ins.x()) != m.regs.get(ins.y());
    skip_if(m, cond);
    Ok(())
}

// ANNN
pub fn mov_i_nnn(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.mem.set_index(ins.nnn());
    Ok(())
}

// BNNN, or BXNN with the jump quirk
pub fn jmp_vx_nnn(m: &mut Machine, ins: Instruction) -> Result<()> {
    let offset = if m.config.jump_quirk {
        m.regs.get(ins.x())
    } else {
        m.regs.get(0x0)
    };
    m.mem.set_pc(ins.nnn().wrapping_add(offset as TypeAddr));
    Ok(())
}

// CXNN
pub fn rnd_vx_nn(m: &mut Machine, ins: Instruction) -> Result<()> {
    let value = m.random_byte() & ins.nn();
    m.regs.set_register(ins.x(), value);
    Ok(())
}

// DXYN, DXY0 draws a 16x16 sprite
pub fn drw(m: &mut Machine, ins: Instruction) -> Result<()> {
    if !m.config.vblank_quirk && !m.vblank {
        // COSMAC display wait: retry until the next frame
        m.mem.decrement_pc();
        return Ok(());
    }

    let (x, y) = (m.regs.get(ins.x()), m.regs.get(ins.y()));
    let (row_bytes, rows) = match ins.n() {
        0 => (2, 16),
        n => (1, n as usize),
    };
    // clipped rows are never read
    let visible = m.fb.visible_rows(y, rows);
    let sprite = m.mem.slice(m.mem.index.0, visible * row_bytes)?;
    let collision = m.fb.paint(x, y, sprite, row_bytes);
    m.regs.set_flag(collision);
    m.vblank = false;
    Ok(())
}

// EX9E
pub fn spr_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    let key = m.regs.get(ins.x());
    let cond = m.keyboard.get_key_status_from_num(key) == Some(true);
    skip_if(m, cond);
    Ok(())
}

// EXA1
pub fn sup_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    let key = m.regs.get(ins.x());
    let cond = m.keyboard.get_key_status_from_num(key) == Some(false);
    skip_if(m, cond);
    Ok(())
}

// FX07
pub fn mov_vx_dt(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.regs.set_register(ins.x(), m.delay_timer.count);
    Ok(())
}

// FX0A
pub fn wait_mov_vx_key(m: &mut Machine, ins: Instruction) -> Result<()> {
    match m.keyboard.key_released.take() {
        Some(key) => {
            m.regs.set_register(ins.x(), key);
            m.keyboard.waiting = false;
        }
        None => {
            m.keyboard.waiting = true;
            m.mem.decrement_pc();
        }
    }
    Ok(())
}

// FX15
pub fn mov_dt_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.delay_timer.set(m.regs.get(ins.x()));
    Ok(())
}

// FX18
pub fn mov_st_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.sound_timer.set(m.regs.get(ins.x()));
    Ok(())
}

// FX1E
pub fn add_i_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.mem.index.advance(m.regs.get(ins.x()) as TypeAddr);
    Ok(())
}

// FX29
pub fn mov_i_font_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.mem.set_index(font_addr(m.regs.get(ins.x())));
    Ok(())
}

// FX30
pub fn mov_i_bfont_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    m.mem.set_index(big_font_addr(m.regs.get(ins.x())));
    Ok(())
}

// FX33
pub fn mov_i_bcd_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    let value = m.regs.get(ins.x());
    let digits = m.mem.slice_mut(m.mem.index.0, 3)?;
    digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
    Ok(())
}

// FX55
pub fn mov_i_vx(m: &mut Machine, ins: Instruction) -> Result<()> {
    let len = ins.x() as usize + 1;
    let dst = m.mem.slice_mut(m.mem.index.0, len)?;
    dst.copy_from_slice(m.regs.up_to(ins.x()));
    if !m.config.memory_quirk {
        m.mem.index.advance(len as TypeAddr);
    }
    Ok(())
}

// FX65
pub fn mov_vx_i(m: &mut Machine, ins: Instruction) -> Result<()> {
    let len = ins.x() as usize + 1;
    let src = m.mem.slice(m.mem.index.0, len)?;
    m.regs.up_to_mut(ins.x()).copy_from_slice(src);
    if !m.config.memory_quirk {
        m.mem.index.advance(len as TypeAddr);
    }
    Ok(())
}
