//! Emerald blocks that give the tree volume between the foliage sprites

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use super::{RigidEntity, TreeLayout};
use crate::evaluate::rigid::RigidCategory;
use crate::math::sampling::{sample_sphere_volume, sample_tree_volume, unit};

/// Blocks assemble into a slightly narrower cone than the foliage
const RADIUS_FACTOR: f32 = 0.9;

#[derive(Clone, Debug, Default)]
pub struct LeafBlocks {
    entities: Vec<RigidEntity>,
}

impl LeafBlocks {
    pub fn build<R: Rng + ?Sized>(rng: &mut R, count: usize, layout: &TreeLayout) -> Self {
        let entities = (0..count)
            .map(|id| {
                let scatter = sample_sphere_volume(rng, layout.scatter_radius);
                let target = sample_tree_volume(rng, layout.height, layout.radius * RADIUS_FACTOR);
                let rotation = Vec3::new(unit(rng) * PI, unit(rng) * PI, unit(rng) * PI);
                RigidEntity {
                    id: id as u32,
                    category: RigidCategory::LeafBlock,
                    scatter,
                    target,
                    rotation,
                    scale: 0.12 + unit(rng) * 0.3,
                }
            })
            .collect();
        Self { entities }
    }

    pub fn entities(&self) -> &[RigidEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_blocks_use_narrower_cone() {
        let mut rng = StdRng::seed_from_u64(8);
        let layout = TreeLayout::default();
        let blocks = LeafBlocks::build(&mut rng, 120, &layout);
        assert_eq!(blocks.len(), 120);
        for (i, b) in blocks.entities().iter().enumerate() {
            assert_eq!(b.id, i as u32);
            assert_eq!(b.category, RigidCategory::LeafBlock);
            let y = b.target.y + layout.height / 2.0;
            let allowed = layout.radius * RADIUS_FACTOR * (1.0 - y / layout.height);
            assert!(b.target.x.hypot(b.target.z) <= allowed + 1e-4);
            assert!((0.12..0.42).contains(&b.scale));
        }
    }
}
