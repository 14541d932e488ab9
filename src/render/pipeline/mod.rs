//! Render pipelines

pub mod mesh;
pub mod particles;

pub use mesh::{GpuPointLight, LightsUniform, MaterialUniform, MeshPipeline};
pub use particles::{SpriteKind, SpritePipeline};
