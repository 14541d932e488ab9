//! Scene composition
//!
//! [`Scene`] owns every population, the morph state and the pointer field.
//! One [`Scene::tick`] per rendered frame advances all smoothed state; the
//! renderer then reads per-population [`FrameContext`]s and instance
//! transforms from it.

pub mod config;
pub mod lights;
pub mod materials;
pub mod palette;

pub use config::{CameraConfig, PopulationCounts, SceneConfig, SmoothingFactors};
pub use lights::{LightRig, PointLight, SpotLight};
pub use materials::MaterialLook;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Result;
use crate::evaluate::{evaluate_pose, write_instances, FrameContext, InstanceSink, LayerCursor};
use crate::interaction::PointerField;
use crate::morph::{MorphState, ProgressSmoother, Smoothing};
use crate::population::{Fireworks, Foliage, LeafBlocks, Ornaments, Snow, TreeSnow};

/// A population paired with the smoothed progress it owns
#[derive(Clone, Debug)]
pub struct Morphing<P> {
    population: P,
    progress: ProgressSmoother,
}

impl<P> Morphing<P> {
    fn new(population: P, smoothing: Smoothing) -> Self {
        Self {
            population,
            progress: ProgressSmoother::new(smoothing),
        }
    }

    pub fn population(&self) -> &P {
        &self.population
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    fn step(&mut self, target: f32, dt: f32) {
        self.progress.step(target, dt);
    }
}

pub struct Scene {
    config: SceneConfig,
    state: MorphState,
    time: f32,
    foliage: Morphing<Foliage>,
    tree_snow: Morphing<TreeSnow>,
    fireworks: Morphing<Fireworks>,
    snow: Snow,
    leaf_blocks: Morphing<LeafBlocks>,
    ornaments: Morphing<Ornaments>,
    pointer: PointerField,
    lights: LightRig,
}

impl Scene {
    /// Build a scene, seeding from `config.seed` or from entropy
    pub fn new(config: SceneConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build a scene drawing every population from `rng`
    pub fn with_rng<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let layout = config.layout;
        let counts = config.counts;
        let mode = config.smoothing_mode;
        let particles = Smoothing::from_mode(mode, config.smoothing.particles);

        let foliage = Foliage::build(rng, counts.foliage, config.gold_ratio, &layout);
        let leaf_blocks = LeafBlocks::build(rng, counts.leaf_blocks, &layout);
        let ornaments = Ornaments::build(rng, &config.ornaments, &layout);
        let tree_snow = TreeSnow::build(rng, counts.tree_snow, &layout);
        let fireworks = Fireworks::build(rng, counts.fireworks, &layout);
        let snow = Snow::build(rng, counts.snow);

        let state = if config.start_assembled {
            MorphState::Assembled
        } else {
            MorphState::Scattered
        };

        log::info!(
            "Scene built: {} foliage, {} tree snow, {} fireworks, {} snow, {} leaf blocks, {} ornaments ({:?} smoothing, start {:?})",
            foliage.len(),
            tree_snow.len(),
            fireworks.len(),
            snow.len(),
            leaf_blocks.len(),
            ornaments.len(),
            mode,
            state,
        );

        let star = ornaments.top_star().scatter;
        Ok(Self {
            foliage: Morphing::new(foliage, particles),
            tree_snow: Morphing::new(tree_snow, particles),
            fireworks: Morphing::new(fireworks, particles),
            snow,
            leaf_blocks: Morphing::new(leaf_blocks, Smoothing::from_mode(mode, config.smoothing.leaf_blocks)),
            ornaments: Morphing::new(ornaments, Smoothing::from_mode(mode, config.smoothing.ornaments)),
            pointer: PointerField::new(config.interaction, mode),
            lights: LightRig::at(0.0, star),
            state,
            time: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn state(&self) -> MorphState {
        self.state
    }

    /// Flip between scattered and assembled; smoothers reverse from wherever they are
    pub fn toggle(&mut self) -> MorphState {
        let next = self.state.toggle();
        log::info!("Morph state: {:?}", next);
        next
    }

    /// Seconds of scene time seen by the last tick
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance all smoothed state by one frame
    pub fn tick(&mut self, dt: f32, time: f32) {
        self.time = time;
        let target = self.state.target();

        self.foliage.step(target, dt);
        self.tree_snow.step(target, dt);
        self.fireworks.step(target, dt);
        self.leaf_blocks.step(target, dt);
        self.ornaments.step(target, dt);
        self.pointer.update(dt);

        self.lights = LightRig::at(time, self.top_star_position());
    }

    /// Feed the pointer in normalized coordinates with the viewport size at the orbit target
    pub fn set_pointer(&mut self, ndc: Vec2, viewport: Vec2) {
        self.pointer.set_pointer(ndc, viewport);
    }

    pub fn pointer(&self) -> &PointerField {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerField {
        &mut self.pointer
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn foliage(&self) -> &Morphing<Foliage> {
        &self.foliage
    }

    pub fn tree_snow(&self) -> &Morphing<TreeSnow> {
        &self.tree_snow
    }

    pub fn fireworks(&self) -> &Morphing<Fireworks> {
        &self.fireworks
    }

    pub fn snow(&self) -> &Snow {
        &self.snow
    }

    pub fn leaf_blocks(&self) -> &Morphing<LeafBlocks> {
        &self.leaf_blocks
    }

    pub fn ornaments(&self) -> &Morphing<Ornaments> {
        &self.ornaments
    }

    pub fn foliage_context(&self) -> FrameContext {
        FrameContext::new(self.time, self.foliage.progress()).with_interaction(self.pointer.sample())
    }

    pub fn tree_snow_context(&self) -> FrameContext {
        FrameContext::new(self.time, self.tree_snow.progress())
    }

    pub fn fireworks_context(&self) -> FrameContext {
        FrameContext::new(self.time, self.fireworks.progress())
    }

    /// Ambient snow ignores progress
    pub fn snow_context(&self) -> FrameContext {
        FrameContext::new(self.time, 0.0)
    }

    pub fn top_star_position(&self) -> Vec3 {
        evaluate_pose(self.ornaments.population.top_star(), self.time, self.ornaments.progress()).position
    }

    /// Write every rigid instance for the current frame into `sink`
    pub fn write_instances(&self, sink: &mut dyn InstanceSink) -> usize {
        let mut cursor = LayerCursor::default();
        let blocks = write_instances(
            self.leaf_blocks.population.entities(),
            self.time,
            self.leaf_blocks.progress(),
            sink,
            &mut cursor,
        );
        let ornaments = write_instances(
            self.ornaments.population.entities(),
            self.time,
            self.ornaments.progress(),
            sink,
            &mut cursor,
        );
        let star = write_instances(
            std::slice::from_ref(self.ornaments.population.top_star()),
            self.time,
            self.ornaments.progress(),
            sink,
            &mut cursor,
        );
        blocks + ornaments + star
    }
}
