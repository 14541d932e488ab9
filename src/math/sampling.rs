//! Volume sampling for scatter clouds and tree silhouettes
//!
//! All generators take the random source explicitly so populations are
//! reproducible from a seed.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Uniform scalar in `[0, 1)`
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}

/// Uniform point inside a sphere of `radius` centred on the origin.
///
/// The radius uses a cube-root correction so that density is uniform per unit
/// volume, not per unit radius.
pub fn sample_sphere_volume<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u = rng.gen_range(0.0f32..1.0);
    let v = rng.gen_range(0.0f32..1.0);
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let r = radius * rng.gen_range(0.0f32..1.0).cbrt();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Point inside a cone of `height` and base radius `max_radius`, vertically
/// centred on the origin (apex at `+height / 2`).
///
/// At height fraction `f` the allowed radius is `max_radius * (1 - f)`, and the
/// radius within that disk uses a square-root correction for uniform areal
/// density.
pub fn sample_tree_volume<R: Rng + ?Sized>(rng: &mut R, height: f32, max_radius: f32) -> Vec3 {
    let y = rng.gen_range(0.0f32..1.0) * height;
    let allowed = max_radius * (1.0 - y / height);
    let r = rng.gen_range(0.0f32..1.0).sqrt() * allowed;
    let theta = rng.gen_range(0.0f32..1.0) * TAU;
    Vec3::new(r * theta.cos(), y - height / 2.0, r * theta.sin())
}

/// Uniform point inside an axis-aligned cube of edge `side` centred on the origin
pub fn sample_cube_volume<R: Rng + ?Sized>(rng: &mut R, side: f32) -> Vec3 {
    Vec3::new(
        (rng.gen_range(0.0f32..1.0) - 0.5) * side,
        (rng.gen_range(0.0f32..1.0) - 0.5) * side,
        (rng.gen_range(0.0f32..1.0) - 0.5) * side,
    )
}
