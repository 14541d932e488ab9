//! Firework sparks orbiting the tree.
//!
//! Sparks have no scattered/target pair: progress only tightens their orbit
//! and calms the chaotic jitter added while scattered.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use super::TreeLayout;
use crate::math::sampling::unit;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FireworkParticle {
    pub size: f32,
    /// Angular speed in radians per second
    pub speed: f32,
    /// Orbit radius once assembled; scattered orbits are 1.8x wider
    pub orbit_radius: f32,
    /// Initial orbit phase
    pub offset: f32,
    /// Height of the orbit plane
    pub height_offset: f32,
    pub random: [f32; 3],
}

impl FireworkParticle {
    pub fn random(&self) -> Vec3 {
        Vec3::from_array(self.random)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Fireworks {
    particles: Vec<FireworkParticle>,
}

impl Fireworks {
    pub fn build<R: Rng + ?Sized>(rng: &mut R, count: usize, layout: &TreeLayout) -> Self {
        let particles = (0..count)
            .map(|_| FireworkParticle {
                size: unit(rng) * 0.12 + 0.05,
                speed: 0.05 + unit(rng) * 0.2,
                orbit_radius: layout.radius * (0.6 + unit(rng) * 1.5),
                offset: unit(rng) * TAU,
                height_offset: (unit(rng) - 0.5) * (layout.height + 4.0),
                random: [unit(rng), unit(rng), unit(rng)],
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[FireworkParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
