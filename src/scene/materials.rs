//! Surface looks for the instanced mesh layers

use glam::Vec3;

use super::palette::{self, linear};
use crate::evaluate::MeshLayer;
use crate::math::easing::twinkle;

/// Surface parameters for one mesh layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialLook {
    /// Base colour, linear
    pub color: Vec3,
    /// Emissive colour, linear
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    /// Skip lighting and output the base colour
    pub unlit: bool,
    /// Modulate roughness with the star-pattern texture
    pub patterned: bool,
}

impl MaterialLook {
    fn lit(color: u32, emissive: u32, emissive_intensity: f32, metalness: f32, roughness: f32) -> Self {
        Self {
            color: linear(color),
            emissive: linear(emissive),
            emissive_intensity,
            metalness,
            roughness,
            unlit: false,
            patterned: false,
        }
    }

    pub fn for_layer(layer: MeshLayer) -> Self {
        use palette::*;
        match layer {
            MeshLayer::LeafBlock => Self::lit(EMERALD, EMERALD, 0.2, 0.2, 0.4),
            MeshLayer::GiftBox => Self::lit(LUXURY_RED, LUXURY_RED, 0.4, 0.15, 0.45),
            MeshLayer::RibbonH | MeshLayer::RibbonV => Self::lit(GOLD, HIGH_GOLD, 0.25, 1.0, 0.05),
            MeshLayer::Bow => Self::lit(GOLD, HIGH_GOLD, 0.4, 1.0, 0.1),
            MeshLayer::Ball => Self::lit(GOLD, HIGH_GOLD, 0.5, 1.0, 0.0),
            MeshLayer::Star => Self {
                unlit: true,
                ..Self::lit(HIGH_GOLD, HIGH_GOLD, 0.0, 0.0, 1.0)
            },
            MeshLayer::Bauble => Self::lit(PEARL, PEARL, 0.4, 1.0, 0.0),
            MeshLayer::Heart => Self::lit(PINK, PINK, 1.0, 0.8, 0.1),
            MeshLayer::RedCube => Self::lit(BRIGHT_RED, BRIGHT_RED, 0.8, 0.8, 0.2),
            MeshLayer::SilverBauble => Self::lit(SILVER, SILVER, 0.0, 0.9, 0.3),
            MeshLayer::SilverStar => Self {
                patterned: true,
                ..Self::lit(MUTED_SILVER, MUTED_SILVER, 0.0, 1.0, 0.6)
            },
            MeshLayer::TopStar => Self::lit(HIGH_GOLD, HIGH_GOLD, 5.0, 1.0, 0.0),
        }
    }

    /// Emissive intensity at `time`; layers without animation keep their base value
    pub fn emissive_at(&self, layer: MeshLayer, time: f32) -> f32 {
        match layer {
            MeshLayer::Ball => 0.2 + (0.3 + 0.7 * twinkle(time, 4.0, 0.0, 10.0)) * 0.5,
            MeshLayer::Heart => 0.8 + (0.5 + 0.5 * (time * 3.0).sin()) * 0.5,
            MeshLayer::TopStar => 4.0 + (time * 6.0).sin() * 2.0,
            _ => self.emissive_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_layer_has_a_look() {
        for layer in MeshLayer::ALL {
            let look = MaterialLook::for_layer(layer);
            assert!((0.0..=1.0).contains(&look.metalness));
            assert!((0.0..=1.0).contains(&look.roughness));
        }
    }

    #[test]
    fn test_only_stars_are_unlit_and_silver_stars_patterned() {
        let unlit: Vec<_> = MeshLayer::ALL.into_iter().filter(|&l| MaterialLook::for_layer(l).unlit).collect();
        assert_eq!(unlit, vec![MeshLayer::Star]);
        let patterned: Vec<_> = MeshLayer::ALL
            .into_iter()
            .filter(|&l| MaterialLook::for_layer(l).patterned)
            .collect();
        assert_eq!(patterned, vec![MeshLayer::SilverStar]);
    }

    #[test]
    fn test_animated_emissive_ranges() {
        let ball = MaterialLook::for_layer(MeshLayer::Ball);
        let heart = MaterialLook::for_layer(MeshLayer::Heart);
        let star = MaterialLook::for_layer(MeshLayer::TopStar);
        for i in 0..400 {
            let t = i as f32 * 0.013;
            let b = ball.emissive_at(MeshLayer::Ball, t);
            assert!((0.35 - 1e-5..=0.7 + 1e-5).contains(&b), "ball {b}");
            let h = heart.emissive_at(MeshLayer::Heart, t);
            assert!((0.8 - 1e-5..=1.3 + 1e-5).contains(&h), "heart {h}");
            let s = star.emissive_at(MeshLayer::TopStar, t);
            assert!((2.0 - 1e-5..=6.0 + 1e-5).contains(&s), "star {s}");
        }
        let cube = MaterialLook::for_layer(MeshLayer::RedCube);
        assert_eq!(cube.emissive_at(MeshLayer::RedCube, 3.0), 0.8);
    }
}
