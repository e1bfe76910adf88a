use minifb::{Key, KeyRepeat, Scale, ScaleMode, Window, WindowOptions};

use crate::{
    display::{FrameBuffer, LORES_HEIGHT, LORES_WIDTH},
    emulator::Emulator,
    keyboard::key_to_num,
};

const BACKGROUND: u32 = 0x000000;

/// Host window. The CHIP-8 buffer is stretched to fit, so switching
/// between lores and hires needs no resize here.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    foreground: u32,
    window: Window,
}

impl Screen {
    pub fn new(title: &str, scale: Scale) -> anyhow::Result<Self> {
        let window = Window::new(
            title,
            LORES_WIDTH,
            LORES_HEIGHT,
            WindowOptions {
                scale,
                scale_mode: ScaleMode::AspectRatioStretch,
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        Ok(Self {
            pixel_buffer: vec![BACKGROUND; LORES_WIDTH * LORES_HEIGHT],
            foreground: from_u16_rgb(0, 127, 255),
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn sync(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        let foreground = self.foreground;
        self.pixel_buffer.clear();
        self.pixel_buffer.extend(
            fb.pixels()
                .iter()
                .map(|&p| if p == 1 { foreground } else { BACKGROUND }),
        );
        self.window
            .update_with_buffer(&self.pixel_buffer, fb.width(), fb.height())?;
        Ok(())
    }

    /// Forward keypad presses and releases seen since the last frame.
    pub fn check_for_keys(&self, emu: &mut Emulator) {
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            if let Some(n) = key_to_num(key) {
                emu.key_down(n);
            }
        }
        for key in self.window.get_keys_released() {
            if let Some(n) = key_to_num(key) {
                emu.key_up(n);
            }
        }
    }
}

fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

pub fn scale_from_factor(factor: u8) -> Option<Scale> {
    match factor {
        1 => Some(Scale::X1),
        2 => Some(Scale::X2),
        4 => Some(Scale::X4),
        8 => Some(Scale::X8),
        16 => Some(Scale::X16),
        32 => Some(Scale::X32),
        _ => None,
    }
}
