//! Entity populations
//!
//! Every population is generated once from a seeded random source and never
//! changes afterwards: each entity keeps the scattered position it was born
//! with and the tree position it assembles into. Only the per-frame outputs
//! computed in [`crate::evaluate`] move.

pub mod fireworks;
pub mod foliage;
pub mod leaf_blocks;
pub mod ornaments;
pub mod snow;
pub mod tree_snow;

pub use fireworks::{FireworkParticle, Fireworks};
pub use foliage::{Foliage, FoliageParticle};
pub use leaf_blocks::LeafBlocks;
pub use ornaments::{OrnamentCounts, OrnamentKind, Ornaments};
pub use snow::{Snow, SnowFlake, SNOW_VOLUME};
pub use tree_snow::{TreeSnow, TreeSnowParticle};

use glam::Vec3;

use crate::evaluate::rigid::RigidCategory;

/// Dimensions of the assembled tree and of the scatter cloud
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreeLayout {
    /// Cone height; the cone is centred vertically on the origin
    pub height: f32,
    /// Cone base radius
    pub radius: f32,
    /// Radius of the scatter sphere
    pub scatter_radius: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            height: 8.0,
            radius: 4.0,
            scatter_radius: 10.0,
        }
    }
}

impl TreeLayout {
    /// Where the top star sits once assembled
    pub fn apex(&self) -> Vec3 {
        Vec3::new(0.0, self.height / 2.0 + 0.5, 0.0)
    }
}

/// One instanced-mesh entity with its two rest positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidEntity {
    /// Running index within the population, used as a sway phase
    pub id: u32,
    pub category: RigidCategory,
    pub scatter: Vec3,
    pub target: Vec3,
    /// Initial Euler angles (XYZ)
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
}
