use crate::display::{HIRES_HEIGHT, HIRES_WIDTH, LORES_HEIGHT, LORES_WIDTH};

/// Interpreter families whose behaviour differs in a handful of opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "frontend", derive(clap::ValueEnum))]
pub enum Profile {
    Chip8,
    #[default]
    SuperChip,
    // opcodes not implemented, only the quirk defaults
    XoChip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 8XY6/8XYE shift VX in place instead of copying VY first
    pub shift_quirk: bool,
    /// BXNN jumps to XNN + VX instead of NNN + V0
    pub jump_quirk: bool,
    /// FX55/FX65 leave I untouched
    pub memory_quirk: bool,
    /// DXYN draws immediately instead of waiting for the vertical blank,
    /// so more than one draw may land in a frame
    pub vblank_quirk: bool,

    pub max_width: usize,
    pub max_height: usize,
}

impl Config {
    pub fn load(profile: Profile) -> Self {
        log::debug!("loading {profile:?} profile");
        match profile {
            Profile::Chip8 => Self::chip8(),
            Profile::SuperChip => Self::super_chip(),
            Profile::XoChip => Self::xo_chip(),
        }
    }

    pub fn chip8() -> Self {
        Self {
            shift_quirk: false,
            jump_quirk: false,
            memory_quirk: false,
            vblank_quirk: false,
            max_width: LORES_WIDTH,
            max_height: LORES_HEIGHT,
        }
    }

    pub fn super_chip() -> Self {
        Self {
            shift_quirk: true,
            jump_quirk: true,
            memory_quirk: true,
            vblank_quirk: true,
            max_width: HIRES_WIDTH,
            max_height: HIRES_HEIGHT,
        }
    }

    pub fn xo_chip() -> Self {
        Self {
            shift_quirk: false,
            jump_quirk: false,
            memory_quirk: false,
            vblank_quirk: false,
            max_width: HIRES_WIDTH,
            max_height: HIRES_HEIGHT,
        }
    }

    pub fn max_pixels(&self) -> usize {
        self.max_width * self.max_height
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load(Profile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let chip8 = Config::load(Profile::Chip8);
        assert!(!chip8.shift_quirk && !chip8.jump_quirk && !chip8.memory_quirk);
        assert_eq!((chip8.max_width, chip8.max_height), (64, 32));

        let schip = Config::load(Profile::SuperChip);
        assert!(schip.shift_quirk && schip.jump_quirk && schip.memory_quirk && schip.vblank_quirk);
        assert_eq!(schip.max_pixels(), 128 * 64);
    }

    #[test]
    fn test_default_is_super_chip() {
        assert_eq!(Config::default(), Config::super_chip());
        assert_eq!(Config::load(Profile::XoChip).max_pixels(), 128 * 64);
    }
}
