//! Scene palette. Entries are sRGB hex; shaders take linear colour.

use glam::Vec3;

pub const EMERALD: u32 = 0x067d53;
pub const GOLD: u32 = 0xffd700;
pub const HIGH_GOLD: u32 = 0xfff200;
pub const WARM_WHITE: u32 = 0xfff4e0;
pub const DARK_BG: u32 = 0x01120b;
pub const LUXURY_RED: u32 = 0xc41e3a;
pub const BRIGHT_RED: u32 = 0xff3131;
pub const CRYSTAL: u32 = 0xe0ffff;
pub const PEARL: u32 = 0xffffff;
pub const SNOW: u32 = 0xffffff;
pub const PINK: u32 = 0xff69b4;
pub const SOFT_PINK: u32 = 0xffb6c1;
pub const SILVER: u32 = 0xa8a9ad;
pub const MUTED_SILVER: u32 = 0x8e8e8e;

/// sRGB transfer function inverse for one channel in [0, 1]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGB of a `0xRRGGBB` colour
pub fn linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(linear(0x000000), Vec3::ZERO);
        assert!((linear(PEARL) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_channel_order() {
        let c = linear(0xff0000);
        assert!((c.x - 1.0).abs() < 1e-6 && c.y == 0.0 && c.z == 0.0);
    }

    #[test]
    fn test_midtone_is_darker_in_linear() {
        let c = linear(0x808080);
        assert!((c.x - 0.2158).abs() < 1e-3);
    }
}
