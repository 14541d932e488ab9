//! Morph state and progress smoothing.
//!
//! [`MorphState`] is the one discrete input of the scene. Every population
//! owns a [`ProgressSmoother`] that chases the target derived from it, so the
//! morph is pure convergence with no keyframed duration.

pub mod smoother;
pub mod state;

pub use smoother::{
    approach, approach_vec3, ProgressSmoother, Smoothing, SmoothingMode, REFERENCE_HZ,
    SETTLE_EPSILON,
};
pub use state::MorphState;
