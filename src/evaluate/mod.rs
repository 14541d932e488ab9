//! Per-frame transform evaluation
//!
//! Point-sprite populations are evaluated on the GPU; [`particle`] holds the
//! host mirror of every per-particle shader function. Rigid populations are
//! evaluated here on the host and written as instance matrices.

pub mod context;
pub mod particle;
pub mod rigid;

pub use context::FrameContext;
pub use particle::{HostMirror, ParticleBatch, ParticleUniforms};
pub use rigid::{
    evaluate_pose, write_instances, Attachment, InstanceRaw, InstanceSink, LayerCursor, MeshLayer,
    MotionStyle, RigidCategory, RigidPose, TransformPolicy,
};
