//! Scene configuration

use crate::core::{Error, Result};
use crate::interaction::InteractionConfig;
use crate::morph::SmoothingMode;
use crate::evaluate::MeshLayer;
use crate::population::{OrnamentCounts, OrnamentKind, TreeLayout};

/// Entity counts for each population
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PopulationCounts {
    pub foliage: usize,
    pub tree_snow: usize,
    pub fireworks: usize,
    pub snow: usize,
    pub leaf_blocks: usize,
}

impl Default for PopulationCounts {
    fn default() -> Self {
        Self {
            foliage: 25_000,
            tree_snow: 4_000,
            fireworks: 1_000,
            snow: 3_000,
            leaf_blocks: 120,
        }
    }
}

/// Per-frame smoothing factors
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmoothingFactors {
    /// Foliage, tree snow and fireworks
    pub particles: f32,
    pub leaf_blocks: f32,
    /// Ornaments and the top star
    pub ornaments: f32,
}

impl Default for SmoothingFactors {
    fn default() -> Self {
        Self {
            particles: 0.05,
            leaf_blocks: 0.04,
            ornaments: 0.05,
        }
    }
}

/// Camera placement and orbit limits
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Start position; the camera looks at the origin
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// 1.0 is one revolution per minute
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            position: [0.0, 2.0, 18.0],
            min_distance: 5.0,
            max_distance: 25.0,
            auto_rotate_speed: 0.5,
        }
    }
}

/// Configuration for the whole scene
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for population generation; `None` draws from entropy
    pub seed: Option<u64>,
    /// Initial morph state is `Assembled` instead of `Scattered`
    pub start_assembled: bool,
    pub smoothing_mode: SmoothingMode,
    pub layout: TreeLayout,
    pub counts: PopulationCounts,
    pub ornaments: OrnamentCounts,
    /// Share of foliage particles that are gold
    pub gold_ratio: f32,
    pub smoothing: SmoothingFactors,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_assembled: false,
            smoothing_mode: SmoothingMode::PerFrame,
            layout: TreeLayout::default(),
            counts: PopulationCounts::default(),
            ornaments: OrnamentCounts::default(),
            gold_ratio: 0.6,
            smoothing: SmoothingFactors::default(),
            interaction: InteractionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be positive, got {value}")))
    }
}

fn smoothing_factor(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be in (0, 1], got {value}")))
    }
}

impl SceneConfig {
    /// Reject configurations the scene cannot be built from
    pub fn validate(&self) -> Result<()> {
        positive("layout.height", self.layout.height)?;
        positive("layout.radius", self.layout.radius)?;
        positive("layout.scatter_radius", self.layout.scatter_radius)?;
        positive("interaction.radius", self.interaction.radius)?;
        positive("camera.fov_degrees", self.camera.fov_degrees)?;
        positive("camera.min_distance", self.camera.min_distance)?;

        smoothing_factor("smoothing.particles", self.smoothing.particles)?;
        smoothing_factor("smoothing.leaf_blocks", self.smoothing.leaf_blocks)?;
        smoothing_factor("smoothing.ornaments", self.smoothing.ornaments)?;
        smoothing_factor("interaction.follow", self.interaction.follow)?;

        if !(0.0..=1.0).contains(&self.gold_ratio) {
            return Err(Error::Config(format!("gold_ratio must be in [0, 1], got {}", self.gold_ratio)));
        }
        if self.camera.max_distance < self.camera.min_distance {
            return Err(Error::Config(format!(
                "camera.max_distance ({}) is below camera.min_distance ({})",
                self.camera.max_distance, self.camera.min_distance
            )));
        }
        Ok(())
    }

    /// Total rigid instances across all layers, attachments included
    pub fn instance_count(&self) -> usize {
        self.counts.leaf_blocks + self.ornaments.total() + 3 * self.ornaments.gifts + 1
    }

    /// Instances written into `layer` each frame
    pub fn layer_capacity(&self, layer: MeshLayer) -> usize {
        let o = &self.ornaments;
        match layer {
            MeshLayer::LeafBlock => self.counts.leaf_blocks,
            MeshLayer::GiftBox | MeshLayer::RibbonH | MeshLayer::RibbonV | MeshLayer::Bow => o.gifts,
            MeshLayer::Ball => o.get(OrnamentKind::Ball),
            MeshLayer::Star => o.get(OrnamentKind::Star),
            MeshLayer::Bauble => o.get(OrnamentKind::Bauble),
            MeshLayer::Heart => o.get(OrnamentKind::Heart),
            MeshLayer::RedCube => o.get(OrnamentKind::RedCube),
            MeshLayer::SilverBauble => o.get(OrnamentKind::SilverBauble),
            MeshLayer::SilverStar => o.get(OrnamentKind::SilverStar),
            MeshLayer::TopStar => 1,
        }
    }
}
