//! Snow crystals resting on the tree

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use super::TreeLayout;
use crate::math::sampling::{sample_sphere_volume, sample_tree_volume, unit};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TreeSnowParticle {
    pub scatter: [f32; 3],
    pub size: f32,
    pub target: [f32; 3],
    pub random: f32,
}

impl TreeSnowParticle {
    pub fn scatter(&self) -> Vec3 {
        Vec3::from_array(self.scatter)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TreeSnow {
    particles: Vec<TreeSnowParticle>,
}

impl TreeSnow {
    pub fn build<R: Rng + ?Sized>(rng: &mut R, count: usize, layout: &TreeLayout) -> Self {
        let particles = (0..count)
            .map(|_| {
                let scatter = sample_sphere_volume(rng, layout.scatter_radius);
                let target = sample_tree_volume(rng, layout.height, layout.radius);
                TreeSnowParticle {
                    scatter: scatter.to_array(),
                    size: unit(rng) * 0.04 + 0.02,
                    target: target.to_array(),
                    random: unit(rng),
                }
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[TreeSnowParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_particle_size() {
        assert_eq!(std::mem::size_of::<TreeSnowParticle>(), 32);
    }

    #[test]
    fn test_build() {
        let mut rng = StdRng::seed_from_u64(4);
        let snow = TreeSnow::build(&mut rng, 1_000, &TreeLayout::default());
        assert_eq!(snow.len(), 1_000);
        for p in snow.particles() {
            assert!((0.02..0.06).contains(&p.size));
            assert!(p.scatter().length() <= 10.0 + 1e-4);
        }
    }
}
