//! Foliage: the emerald and gold needle cloud that forms the body of the tree

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use super::TreeLayout;
use crate::math::sampling::{sample_sphere_volume, sample_tree_volume, unit};

/// Per-particle foliage attributes, uploaded as one instance-rate vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageParticle {
    /// Scattered position (12 bytes, offset 0)
    pub scatter: [f32; 3],
    /// Base sprite size (4 bytes, offset 12)
    pub size: f32,
    /// Assembled position (12 bytes, offset 16)
    pub target: [f32; 3],
    /// Per-particle random in [0, 1) (4 bytes, offset 28)
    pub random: f32,
    /// 0.0 emerald, 1.0 gold (4 bytes, offset 32)
    pub kind: f32,
}

impl FoliageParticle {
    pub fn scatter(&self) -> Vec3 {
        Vec3::from_array(self.scatter)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }

    pub fn is_gold(&self) -> bool {
        self.kind > 0.5
    }
}

/// Foliage population
#[derive(Clone, Debug, Default)]
pub struct Foliage {
    particles: Vec<FoliageParticle>,
}

impl Foliage {
    /// Generate `count` particles; each is gold with probability `gold_ratio`
    pub fn build<R: Rng + ?Sized>(rng: &mut R, count: usize, gold_ratio: f32, layout: &TreeLayout) -> Self {
        let particles = (0..count)
            .map(|_| {
                let scatter = sample_sphere_volume(rng, layout.scatter_radius);
                let target = sample_tree_volume(rng, layout.height, layout.radius);
                let size = unit(rng) * 0.1 + 0.04;
                let random = unit(rng);
                let kind = if unit(rng) < gold_ratio { 1.0 } else { 0.0 };
                FoliageParticle {
                    scatter: scatter.to_array(),
                    size,
                    target: target.to_array(),
                    random,
                    kind,
                }
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[FoliageParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of gold particles
    pub fn gold_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_gold()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_particle_size() {
        assert_eq!(std::mem::size_of::<FoliageParticle>(), 36);
    }

    #[test]
    fn test_build_count_and_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = TreeLayout::default();
        let foliage = Foliage::build(&mut rng, 5_000, 0.6, &layout);
        assert_eq!(foliage.len(), 5_000);

        for p in foliage.particles() {
            assert!(p.scatter().length() <= layout.scatter_radius + 1e-4);
            assert!(p.target().y.abs() <= layout.height / 2.0 + 1e-4);
            assert!((0.04..0.14).contains(&p.size), "size {}", p.size);
            assert!((0.0..1.0).contains(&p.random));
            assert!(p.kind == 0.0 || p.kind == 1.0);
        }
    }

    #[test]
    fn test_gold_ratio() {
        let mut rng = StdRng::seed_from_u64(2);
        let foliage = Foliage::build(&mut rng, 10_000, 0.6, &TreeLayout::default());
        let ratio = foliage.gold_count() as f32 / foliage.len() as f32;
        assert!((ratio - 0.6).abs() < 0.03, "gold ratio {ratio}");
    }

    #[test]
    fn test_empty_population() {
        let mut rng = StdRng::seed_from_u64(3);
        let foliage = Foliage::build(&mut rng, 0, 0.6, &TreeLayout::default());
        assert!(foliage.is_empty());
    }
}
