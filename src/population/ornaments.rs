//! Ornaments: eight decoration kinds plus the top star.
//!
//! All ornaments share one smoothed progress. Each kind raises it to its own
//! easing weight, so gifts (0.35) land well before stars (1.0).

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use super::{RigidEntity, TreeLayout};
use crate::evaluate::rigid::{MeshLayer, RigidCategory};
use crate::math::sampling::{sample_sphere_volume, sample_tree_volume, unit};

/// Ornament kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OrnamentKind {
    Gift,
    Ball,
    Star,
    Bauble,
    Heart,
    RedCube,
    SilverBauble,
    SilverStar,
}

impl OrnamentKind {
    /// Generation order
    pub const ALL: [OrnamentKind; 8] = [
        OrnamentKind::Gift,
        OrnamentKind::Ball,
        OrnamentKind::Star,
        OrnamentKind::Bauble,
        OrnamentKind::Heart,
        OrnamentKind::RedCube,
        OrnamentKind::SilverBauble,
        OrnamentKind::SilverStar,
    ];

    /// Easing exponent applied to the shared progress
    pub fn weight(self) -> f32 {
        match self {
            OrnamentKind::Gift => 0.35,
            OrnamentKind::Ball => 0.6,
            _ => 1.0,
        }
    }

    /// Uniform instance scale
    pub fn scale(self) -> f32 {
        match self {
            OrnamentKind::Gift => 0.38,
            OrnamentKind::Ball => 0.15,
            OrnamentKind::Star | OrnamentKind::SilverStar => 0.05,
            OrnamentKind::Bauble => 0.2,
            OrnamentKind::Heart => 0.25,
            OrnamentKind::RedCube => 0.08,
            OrnamentKind::SilverBauble => 0.18,
        }
    }

    /// Mesh layer the kind's base instance is written into
    pub fn layer(self) -> MeshLayer {
        match self {
            OrnamentKind::Gift => MeshLayer::GiftBox,
            OrnamentKind::Ball => MeshLayer::Ball,
            OrnamentKind::Star => MeshLayer::Star,
            OrnamentKind::Bauble => MeshLayer::Bauble,
            OrnamentKind::Heart => MeshLayer::Heart,
            OrnamentKind::RedCube => MeshLayer::RedCube,
            OrnamentKind::SilverBauble => MeshLayer::SilverBauble,
            OrnamentKind::SilverStar => MeshLayer::SilverStar,
        }
    }
}

/// Number of ornaments per kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrnamentCounts {
    pub gifts: usize,
    pub balls: usize,
    pub stars: usize,
    pub baubles: usize,
    pub hearts: usize,
    pub red_cubes: usize,
    pub silver_baubles: usize,
    pub silver_stars: usize,
}

impl Default for OrnamentCounts {
    fn default() -> Self {
        Self {
            gifts: 15,
            balls: 30,
            stars: 50,
            baubles: 25,
            hearts: 25,
            red_cubes: 40,
            silver_baubles: 20,
            silver_stars: 15,
        }
    }
}

impl OrnamentCounts {
    pub fn get(&self, kind: OrnamentKind) -> usize {
        match kind {
            OrnamentKind::Gift => self.gifts,
            OrnamentKind::Ball => self.balls,
            OrnamentKind::Star => self.stars,
            OrnamentKind::Bauble => self.baubles,
            OrnamentKind::Heart => self.hearts,
            OrnamentKind::RedCube => self.red_cubes,
            OrnamentKind::SilverBauble => self.silver_baubles,
            OrnamentKind::SilverStar => self.silver_stars,
        }
    }

    pub fn total(&self) -> usize {
        OrnamentKind::ALL.iter().map(|&k| self.get(k)).sum()
    }
}

/// All ornaments and the top star
#[derive(Clone, Debug)]
pub struct Ornaments {
    entities: Vec<RigidEntity>,
    top_star: RigidEntity,
}

impl Ornaments {
    pub fn build<R: Rng + ?Sized>(rng: &mut R, counts: &OrnamentCounts, layout: &TreeLayout) -> Self {
        let mut entities = Vec::with_capacity(counts.total());
        for kind in OrnamentKind::ALL {
            for _ in 0..counts.get(kind) {
                let id = entities.len() as u32;
                let scatter = sample_sphere_volume(rng, layout.scatter_radius);
                let target = sample_tree_volume(rng, layout.height, layout.radius);
                let rotation = Vec3::new(unit(rng) * PI, unit(rng) * PI, unit(rng) * PI);
                entities.push(RigidEntity {
                    id,
                    category: RigidCategory::Ornament(kind),
                    scatter,
                    target,
                    rotation,
                    scale: kind.scale(),
                });
            }
        }

        let top_star = RigidEntity {
            id: 0,
            category: RigidCategory::TopStar,
            scatter: sample_sphere_volume(rng, layout.scatter_radius),
            target: layout.apex(),
            rotation: Vec3::ZERO,
            scale: 0.7,
        };

        Self { entities, top_star }
    }

    pub fn entities(&self) -> &[RigidEntity] {
        &self.entities
    }

    pub fn top_star(&self) -> &RigidEntity {
        &self.top_star
    }

    /// Ornaments of one kind, in generation order
    pub fn of_kind(&self, kind: OrnamentKind) -> impl Iterator<Item = &RigidEntity> {
        self.entities
            .iter()
            .filter(move |e| e.category == RigidCategory::Ornament(kind))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
