//! Ambient snowfall around the scene. Not part of the morph.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::math::sampling::{sample_cube_volume, unit};

/// Edge of the cube the flakes are spawned in, and the height of the column they wrap in
pub const SNOW_VOLUME: f32 = 30.0;

/// Share of flakes drawn from the large size band
const LARGE_FLAKE_RATIO: f32 = 0.1;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SnowFlake {
    pub position: [f32; 3],
    /// Fall speed factor
    pub speed: f32,
    /// Phase for drift, pulse and spin
    pub offset: f32,
    pub size: f32,
    pub random: [f32; 3],
}

impl SnowFlake {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn random(&self) -> Vec3 {
        Vec3::from_array(self.random)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Snow {
    flakes: Vec<SnowFlake>,
}

impl Snow {
    pub fn build<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let flakes = (0..count)
            .map(|_| {
                let position = sample_cube_volume(rng, SNOW_VOLUME);
                let speed = 0.3 + unit(rng) * 0.8;
                let offset = unit(rng) * TAU;
                let size = if unit(rng) < LARGE_FLAKE_RATIO {
                    unit(rng) * 0.15 + 0.1
                } else {
                    unit(rng) * 0.06 + 0.03
                };
                SnowFlake {
                    position: position.to_array(),
                    speed,
                    offset,
                    size,
                    random: [unit(rng), unit(rng), unit(rng)],
                }
            })
            .collect();
        Self { flakes }
    }

    pub fn flakes(&self) -> &[SnowFlake] {
        &self.flakes
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }
}
