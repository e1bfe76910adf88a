use std::{cell::Cell, fs, path::PathBuf, process, rc::Rc};

use superchip::{memory::PROGRAM_START, Chip8Error, Config, Emulator, Signal, State};

fn write_rom(name: &str, program: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("superchip-{}-{name}.ch8", process::id()));
    fs::write(&path, program).unwrap();
    path
}

#[test]
fn load_rom_from_file() {
    let program = [0x00, 0xE0, 0x12, 0x00];
    let path = write_rom("load", &program);

    let mut emu = Emulator::with_seed(Config::chip8(), 7);
    emu.load_rom(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(emu.state(), State::Running);
    assert_eq!(emu.machine.mem.pc.0, PROGRAM_START);
    assert_eq!(emu.machine.mem.slice(PROGRAM_START, 4).unwrap(), &program);
    assert_eq!(emu.peek_instruction().unwrap(), 0x00E0);
}

#[test]
fn draw_glyph_then_exit() {
    // V0 = 0; V1 = 0; I = font '0'; draw 5 rows; exit
    let program = [0x60, 0x00, 0x61, 0x00, 0xA0, 0x00, 0xD0, 0x15, 0x00, 0xFD];
    let path = write_rom("draw", &program);

    let mut emu = Emulator::with_seed(Config::chip8(), 7);
    emu.load_rom(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let exited = Rc::new(Cell::new(false));
    let seen = Rc::clone(&exited);
    emu.set_callback(move |signal| {
        if signal == Signal::Exit {
            seen.set(true);
        }
    });

    for _ in 0..5 {
        emu.cycle().unwrap();
    }
    assert!(exited.get());

    let fb = emu.display();
    // top row of the '0' glyph is 0xF0
    for x in 0..4 {
        assert_eq!(fb.pixel(x, 0), Some(1));
    }
    assert_eq!(fb.pixel(4, 0), Some(0));
    // middle rows are 0x90
    assert_eq!(fb.pixel(0, 2), Some(1));
    assert_eq!(fb.pixel(1, 2), Some(0));
    assert_eq!(fb.pixel(3, 2), Some(1));
    assert_eq!(emu.machine.regs.flag(), 0);
}

#[test]
fn missing_rom_is_an_error() {
    let mut emu = Emulator::default();
    let path = std::env::temp_dir().join("superchip-does-not-exist.ch8");
    assert!(matches!(
        emu.load_rom(&path),
        Err(Chip8Error::RomRead { .. })
    ));
    assert!(matches!(emu.cycle(), Err(Chip8Error::NoRomLoaded)));
}

#[test]
fn oversized_rom_is_rejected() {
    let path = write_rom("huge", &vec![0xAA; 4096]);
    let mut emu = Emulator::default();
    let result = emu.load_rom(&path);
    fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(Chip8Error::RomTooLarge { size: 4096, .. })));
    assert_eq!(emu.state(), State::Idle);
}
