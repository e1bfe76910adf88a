use std::{
    cell::Cell,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use superchip::{
    sound::Sound,
    timer::{Pacer, TIMER_DEC_PER_SECOND},
    window::{scale_from_factor, Screen},
    Chip8Error, Config, Emulator, Profile, Signal,
};

/// CHIP-8 and SUPER-CHIP interpreter
///
/// Keys 1234/QWER/ASDF/ZXCV map onto the hex keypad, ESC quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The program file
    rom: PathBuf,

    /// Which interpreter's quirks to follow
    #[arg(short, long, value_enum, default_value_t = Profile::SuperChip)]
    profile: Profile,

    /// Instructions executed per 60 Hz frame
    #[arg(short, long, default_value_t = 15)]
    ticks_per_frame: u32,

    /// Window scale factor: 1, 2, 4, 8, 16 or 32
    #[arg(short, long, default_value_t = 8)]
    scale: u8,

    /// Disable sound
    #[arg(short, long)]
    mute: bool,

    /// Log invalid instructions and carry on instead of stopping
    #[arg(long)]
    skip_invalid: bool,
}

// Separately:
// CPU: ticks_per_frame * 60 times per second
// Display: 60 times per second
// Timer: 60 times per second

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let scale = scale_from_factor(args.scale)
        .with_context(|| format!("unsupported window scale {}", args.scale))?;

    let mut emu = Emulator::new(Config::load(args.profile));
    emu.load_rom(&args.rom)?;

    let running = Rc::new(Cell::new(true));
    let exit = Rc::clone(&running);
    // the window stretches whatever resolution it is given, so only exit matters
    emu.set_callback(move |signal| {
        if signal == Signal::Exit {
            exit.set(false);
        }
    });

    let mut screen = Screen::new("superchip - ESC to exit", scale)?;
    let sound = if args.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(err) => {
                log::warn!("sound disabled: {err:#}");
                None
            }
        }
    };

    let mut frame = Pacer::new(TIMER_DEC_PER_SECOND, Instant::now());
    while running.get() && screen.is_open() {
        if !frame.sync(Instant::now()) {
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }

        for _ in 0..args.ticks_per_frame {
            match emu.cycle() {
                Ok(()) => {}
                Err(err @ Chip8Error::InvalidOpcode { .. }) if args.skip_invalid => {
                    log::warn!("skipping: {err}");
                }
                Err(err) => return Err(anyhow::Error::new(err).context("emulation halted")),
            }
            if !running.get() {
                break;
            }
        }

        let beeping = emu.update_timers();
        if let Some(sound) = &sound {
            sound.beep(beeping);
        }
        screen.sync(emu.display())?;
        screen.check_for_keys(&mut emu);
    }

    if let Some(sound) = &sound {
        sound.beep(false);
    }
    Ok(())
}
