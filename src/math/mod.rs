//! Mathematical utilities

pub mod easing;
pub mod sampling;

pub use easing::{eased_progress, lerp, smoothstep, twinkle};
pub use sampling::{sample_cube_volume, sample_sphere_volume, sample_tree_volume};
