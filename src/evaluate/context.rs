//! Per-frame inputs shared by every evaluator

use crate::interaction::InteractionSample;

/// Everything a population needs to evaluate one frame.
///
/// Built fresh each frame by the scene and passed by value; evaluators never
/// reach for global state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// Seconds since the scene started
    pub time: f32,
    /// This population's smoothed progress in [0, 1]
    pub progress: f32,
    /// Pointer field, foliage only
    pub interaction: Option<InteractionSample>,
}

impl FrameContext {
    pub fn new(time: f32, progress: f32) -> Self {
        Self {
            time,
            progress,
            interaction: None,
        }
    }

    pub fn with_interaction(mut self, sample: InteractionSample) -> Self {
        self.interaction = Some(sample);
        self
    }
}
