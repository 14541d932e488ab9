//! Animated light rig

use glam::Vec3;

use super::palette;

/// Omni light with an optional range (0 = unlimited)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// Cone light aimed at the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Fraction of the cone that fades out, in [0, 1]
    pub penumbra: f32,
}

/// Every light in the scene for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: f32,
    /// Gold key light circling above the front-right of the tree
    pub key: SpotLight,
    /// Emerald fill from below and behind
    pub accent: PointLight,
    /// Warm rim light orbiting the tree
    pub rim: PointLight,
    /// Glow carried by the top star
    pub star: PointLight,
}

impl LightRig {
    /// Light rig at `time`, with the star light following `star_position`
    pub fn at(time: f32, star_position: Vec3) -> Self {
        let t = time;
        let key_position = Vec3::new(10.0 + (t * 0.5).cos() * 2.0, 10.0, 10.0 + (t * 0.5).sin() * 2.0);
        Self {
            ambient: 0.15 + (t * 0.5).sin() * 0.05,
            key: SpotLight {
                position: key_position,
                direction: (-key_position).normalize_or_zero(),
                color: palette::linear(palette::HIGH_GOLD),
                intensity: 1.2 + (t * 0.8).sin() * 0.3,
                angle: 0.25,
                penumbra: 1.0,
            },
            accent: PointLight {
                position: Vec3::new(-10.0, -5.0, -10.0),
                color: palette::linear(palette::EMERALD),
                intensity: 0.4 + (t * 1.2).sin() * 0.2,
                range: 0.0,
            },
            rim: PointLight {
                position: Vec3::new((t * 0.4).sin() * 12.0, 5.0, (t * 0.4).cos() * 12.0),
                color: palette::linear(palette::WARM_WHITE),
                intensity: 0.8 + (t * 2.0).sin() * 0.4,
                range: 25.0,
            },
            star: PointLight {
                position: star_position,
                color: palette::linear(palette::HIGH_GOLD),
                intensity: 5.0,
                range: 8.0,
            },
        }
    }

    /// The point lights in shader order
    pub fn points(&self) -> [PointLight; 3] {
        [self.accent, self.rim, self.star]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_at_zero() {
        let rig = LightRig::at(0.0, Vec3::Y);
        assert!((rig.ambient - 0.15).abs() < 1e-6);
        assert_eq!(rig.key.position, Vec3::new(12.0, 10.0, 10.0));
        assert_eq!(rig.rim.position, Vec3::new(0.0, 5.0, 12.0));
        assert_eq!(rig.star.position, Vec3::Y);
    }

    #[test]
    fn test_rim_orbits_at_fixed_radius() {
        for i in 0..20 {
            let rig = LightRig::at(i as f32 * 0.7, Vec3::ZERO);
            let r = rig.rim.position.x.hypot(rig.rim.position.z);
            assert!((r - 12.0).abs() < 1e-4);
            assert!(rig.rim.intensity >= 0.4 - 1e-6 && rig.rim.intensity <= 1.2 + 1e-6);
        }
    }

    #[test]
    fn test_key_aims_at_origin() {
        let rig = LightRig::at(3.0, Vec3::ZERO);
        let to_origin = (-rig.key.position).normalize();
        assert!((rig.key.direction - to_origin).length() < 1e-6);
    }
}
