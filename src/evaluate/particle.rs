//! Host mirror of the point-sprite shaders
//!
//! Each function here matches the corresponding WGSL in `shaders/` term for
//! term. The renderer never calls them per particle; they exist for tests,
//! benchmarks and [`ParticleBatch`] diagnostics.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rayon::prelude::*;

use super::context::FrameContext;
use crate::math::easing::{lerp, smoothstep, twinkle};
use crate::population::{FireworkParticle, FoliageParticle, SnowFlake, TreeSnowParticle, SNOW_VOLUME};

/// Pixel-size numerators: sprite size in pixels is `size * k / depth`
pub const FOLIAGE_SIZE_SCALE: f32 = 500.0;
pub const TREE_SNOW_SIZE_SCALE: f32 = 350.0;
pub const FIREWORK_SIZE_SCALE: f32 = 550.0;
pub const SNOW_SIZE_SCALE: f32 = 600.0;

/// Uniform block shared by all sprite shaders (must match `ParticleUniforms` in WGSL)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    /// Smoothed pointer position (12 bytes, offset 0)
    pub pointer: [f32; 3],
    /// Elapsed seconds (4 bytes, offset 12)
    pub time: f32,
    /// Primary colour, linear (12 bytes, offset 16)
    pub color_a: [f32; 3],
    /// Smoothed progress (4 bytes, offset 28)
    pub progress: f32,
    /// Secondary colour, linear (12 bytes, offset 32)
    pub color_b: [f32; 3],
    /// Pointer strength (4 bytes, offset 44)
    pub strength: f32,
    /// Pointer pulling blend (4 bytes, offset 48)
    pub pulling: f32,
    /// Pointer radius; zero disables the field (4 bytes, offset 52)
    pub radius: f32,
    /// Pointer force (4 bytes, offset 56)
    pub force: f32,
    /// Tree base radius (4 bytes, offset 60)
    pub tree_radius: f32,
}

impl ParticleUniforms {
    pub fn new(ctx: &FrameContext, color_a: Vec3, color_b: Vec3, tree_radius: f32) -> Self {
        let mut uniforms = Self {
            time: ctx.time,
            progress: ctx.progress,
            color_a: color_a.to_array(),
            color_b: color_b.to_array(),
            tree_radius,
            ..Default::default()
        };
        if let Some(field) = ctx.interaction {
            uniforms.pointer = field.position.to_array();
            uniforms.strength = field.strength;
            uniforms.pulling = field.pulling;
            uniforms.radius = field.radius;
            uniforms.force = field.force;
        }
        uniforms
    }
}

/// Sprite size in pixels for a particle `depth` units in front of the camera
pub fn point_size(size: f32, scale: f32, depth: f32) -> f32 {
    size * scale / depth.max(1e-3)
}

/// Radial falloff of a round sprite at `coord` in [-1, 1]^2.
///
/// Returns `(core, aura)`, or `None` where the fragment is discarded.
pub fn sprite_falloff(coord: Vec2) -> Option<(f32, f32)> {
    let r2 = coord.length_squared();
    if r2 > 1.0 {
        return None;
    }
    Some(((-6.0 * r2).exp(), (-2.5 * r2).exp()))
}

/// Wind sway applied to foliage, stronger once assembled
pub fn foliage_wind(base: Vec3, time: f32, progress: f32) -> Vec3 {
    let wind_time = time * 0.8;
    let x = (wind_time + base.y * 0.5).sin() * 0.1;
    let z = (wind_time * 0.7 + base.z * 0.3).cos() * 0.1;
    Vec3::new(x, 0.0, z) * (0.5 + progress * 0.5)
}

/// Per-vertex foliage outputs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoliageVertex {
    pub position: Vec3,
    /// Pointer influence in [0, 1]
    pub influence: f32,
    pub shimmer: f32,
    pub glow: f32,
}

pub fn foliage_vertex(p: &FoliageParticle, ctx: &FrameContext) -> FoliageVertex {
    let base = p.scatter().lerp(p.target(), ctx.progress);
    let mut position = base + foliage_wind(base, ctx.time, ctx.progress);

    let mut influence = 0.0;
    if let Some(field) = ctx.interaction {
        let (offset, weight) = field.displacement(position);
        position += offset;
        influence = weight;
    }

    let frequency = lerp(1.5, 3.0, p.kind) + p.random * 1.5;
    FoliageVertex {
        position,
        influence,
        shimmer: twinkle(ctx.time, frequency, 0.0, 4.0),
        glow: 0.7 + 0.2 * (ctx.time * 0.8 + p.random * 10.0).sin(),
    }
}

pub fn tree_snow_position(p: &TreeSnowParticle, ctx: &FrameContext) -> Vec3 {
    let base = p.scatter().lerp(p.target(), ctx.progress);
    let t = ctx.time * (0.5 + p.random);
    base + Vec3::new(t.sin() * 0.05, (t * 1.3).sin() * 0.02, t.cos() * 0.05)
}

pub fn tree_snow_shimmer(p: &TreeSnowParticle, time: f32) -> f32 {
    twinkle(time, 3.0 + p.random * 6.0, 0.0, 5.0)
}

pub fn firework_position(p: &FireworkParticle, ctx: &FrameContext) -> Vec3 {
    let (t, progress) = (ctx.time, ctx.progress);
    let phase = t * p.speed + p.offset;
    let radius = lerp(p.orbit_radius * 1.8, p.orbit_radius, progress);
    let chaos = (1.0 - progress) * 3.0;
    let rnd = p.random();
    Vec3::new(
        phase.cos() * radius + (t * 1.5 + rnd.x * 12.0).sin() * chaos,
        p.height_offset + (phase * 0.5).sin() * 1.2 + (t * 1.2 + rnd.z * 12.0).sin() * chaos,
        phase.sin() * radius + (t * 1.6 + rnd.y * 12.0).cos() * chaos,
    )
}

/// Sparks fade out with distance from the centre
pub fn firework_opacity(position: Vec3) -> f32 {
    smoothstep(22.0, 5.0, position.length())
}

pub fn firework_shimmer(p: &FireworkParticle, time: f32) -> f32 {
    twinkle(time, 6.0 + p.random[0] * 10.0, 0.0, 3.0)
}

pub fn firework_size_pulse(p: &FireworkParticle, time: f32) -> f32 {
    1.0 + 0.3 * (time * 4.0 + p.offset).sin()
}

/// Falling, wrapping, drifting flake position
pub fn snow_position(f: &SnowFlake, time: f32) -> Vec3 {
    let half = SNOW_VOLUME / 2.0;
    let rnd = f.random();
    let mut pos = f.position();
    let fallen = pos.y - time * f.speed * 2.5;
    pos.y = (fallen + half).rem_euclid(SNOW_VOLUME) - half;
    pos.x += (time * 0.8 * rnd.x + f.offset).sin() * 0.8;
    pos.z += (time * 0.7 * rnd.z + f.offset).cos() * 0.8;
    pos.x += (time * 2.5 + rnd.y * 10.0).sin() * 0.15;
    pos
}

/// Flakes fade near the top and bottom of the column
pub fn snow_alpha(f: &SnowFlake, position: Vec3) -> f32 {
    smoothstep(15.0, 10.0, position.y.abs()) * (0.6 + 0.4 * f.random[1])
}

pub fn snow_sparkle(f: &SnowFlake, time: f32) -> f32 {
    twinkle(time, 15.0 + f.random[2] * 10.0, 0.0, 10.0)
}

/// A particle type with a host-side position function
pub trait HostMirror: Sync {
    fn position(&self, ctx: &FrameContext) -> Vec3;
}

impl HostMirror for FoliageParticle {
    fn position(&self, ctx: &FrameContext) -> Vec3 {
        foliage_vertex(self, ctx).position
    }
}

impl HostMirror for TreeSnowParticle {
    fn position(&self, ctx: &FrameContext) -> Vec3 {
        tree_snow_position(self, ctx)
    }
}

impl HostMirror for FireworkParticle {
    fn position(&self, ctx: &FrameContext) -> Vec3 {
        firework_position(self, ctx)
    }
}

impl HostMirror for SnowFlake {
    fn position(&self, ctx: &FrameContext) -> Vec3 {
        snow_position(self, ctx.time)
    }
}

/// Parallel host evaluation of a whole population
pub struct ParticleBatch;

impl ParticleBatch {
    pub fn evaluate<P: HostMirror>(particles: &[P], ctx: &FrameContext) -> Vec<Vec3> {
        particles.par_iter().map(|p| p.position(ctx)).collect()
    }

    /// Axis-aligned bounds of the evaluated positions, `None` when empty
    pub fn bounds<P: HostMirror>(particles: &[P], ctx: &FrameContext) -> Option<(Vec3, Vec3)> {
        particles
            .par_iter()
            .map(|p| {
                let pos = p.position(ctx);
                (pos, pos)
            })
            .reduce_with(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}
