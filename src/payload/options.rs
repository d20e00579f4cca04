//! Option bitmask understood by the engine

#![allow(dead_code)]

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::models::TestConfig;

/// Packed option bits sent in the `<option>` element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionFlags(u32);

impl OptionFlags {
    pub const NONE: OptionFlags = OptionFlags(0);
    pub const ANISO: OptionFlags = OptionFlags(1);
    pub const MULTISAMPLE: OptionFlags = OptionFlags(1 << 1);
    pub const PBUFFER: OptionFlags = OptionFlags(1 << 2);
    pub const MULTISAMPLE_HINT: OptionFlags = OptionFlags(1 << 3);
    pub const LOD_BIAS: OptionFlags = OptionFlags(1 << 4);
    pub const FOG: OptionFlags = OptionFlags(1 << 5);
    pub const FBO: OptionFlags = OptionFlags(1 << 6);
    pub const ARGB: OptionFlags = OptionFlags(1 << 7);
    pub const FB_FLOAT32: OptionFlags = OptionFlags(1 << 8);
    /// Exclusive fullscreen, always paired with [`Self::FULLSCREEN`]
    pub const FULLSCREEN_EX: OptionFlags = OptionFlags(1 << 9);
    pub const CLIP_PLANE: OptionFlags = OptionFlags(1 << 10);
    pub const FULLSCREEN: OptionFlags = OptionFlags(1 << 11);
    pub const VSYNC: OptionFlags = OptionFlags(1 << 12);
    pub const TRANSPARENCY: OptionFlags = OptionFlags(1 << 13);
    pub const MIPMAP: OptionFlags = OptionFlags(1 << 14);
    pub const RETINA_DISPLAY: OptionFlags = OptionFlags(1 << 15);
    pub const MP_ENGINE: OptionFlags = OptionFlags(1 << 16);
    pub const INSTANCING: OptionFlags = OptionFlags(1 << 17);
    pub const VBUM: OptionFlags = OptionFlags(1 << 18);
    pub const DEBUG: OptionFlags = OptionFlags(1 << 20);

    /// Collect the bits of every boolean feature enabled in `config`
    pub fn from_config(config: &TestConfig) -> Self {
        let mut flags = Self::NONE;
        if config.fullscreen {
            flags |= Self::FULLSCREEN | Self::FULLSCREEN_EX;
        }
        if config.debug_output {
            flags |= Self::DEBUG;
        }
        if config.vsync {
            flags |= Self::VSYNC;
        }
        if config.fog {
            flags |= Self::FOG;
        }
        if config.transparency {
            flags |= Self::TRANSPARENCY;
        }
        if config.user_clip_plane {
            flags |= Self::CLIP_PLANE;
        }
        flags
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: OptionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for OptionFlags {
    type Output = OptionFlags;

    fn bitor(self, rhs: OptionFlags) -> OptionFlags {
        OptionFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OptionFlags {
    fn bitor_assign(&mut self, rhs: OptionFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for OptionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let flags = OptionFlags::from_config(&TestConfig::default());
        assert!(flags.is_empty());
        assert_eq!(flags.to_string(), "0");
    }

    #[test]
    fn test_each_flag_maps_to_its_bits() {
        let cases: Vec<(fn(&mut TestConfig), u32)> = vec![
            (|c| c.fullscreen = true, (1 << 11) | (1 << 9)),
            (|c| c.debug_output = true, 1 << 20),
            (|c| c.vsync = true, 1 << 12),
            (|c| c.fog = true, 1 << 5),
            (|c| c.transparency = true, 1 << 13),
            (|c| c.user_clip_plane = true, 1 << 10),
        ];

        for (enable, expected) in cases {
            let mut config = TestConfig::default();
            enable(&mut config);
            assert_eq!(OptionFlags::from_config(&config).bits(), expected);
        }
    }

    #[test]
    fn test_flags_combine_with_or() {
        let config = TestConfig {
            fog: true,
            vsync: true,
            debug_output: true,
            ..TestConfig::default()
        };
        let flags = OptionFlags::from_config(&config);
        assert_eq!(flags.bits(), (1 << 5) | (1 << 12) | (1 << 20));
        assert!(flags.contains(OptionFlags::FOG | OptionFlags::VSYNC));
        assert!(!flags.contains(OptionFlags::TRANSPARENCY));
    }

    #[test]
    fn test_quality_options() {
        let flags = OptionFlags::from_config(&TestConfig::quality());
        assert_eq!(flags, OptionFlags::FOG | OptionFlags::TRANSPARENCY);
    }
}
