//! The scattered/assembled toggle

/// Which configuration the scene is converging toward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MorphState {
    /// Entities float in the scatter sphere
    #[default]
    Scattered,
    /// Entities form the tree silhouette
    Assembled,
}

impl MorphState {
    /// The other state
    pub fn toggled(self) -> Self {
        match self {
            Self::Scattered => Self::Assembled,
            Self::Assembled => Self::Scattered,
        }
    }

    /// Flip in place and return the new state
    pub fn toggle(&mut self) -> Self {
        *self = self.toggled();
        *self
    }

    /// Progress value the smoothers converge to
    pub fn target(self) -> f32 {
        match self {
            Self::Scattered => 0.0,
            Self::Assembled => 1.0,
        }
    }

    /// Label for the control that triggers the next toggle
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Scattered => "Assemble Tree",
            Self::Assembled => "Scatter Particles",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut state = MorphState::default();
        assert_eq!(state, MorphState::Scattered);
        assert_eq!(state.toggle(), MorphState::Assembled);
        assert_eq!(state.toggle(), MorphState::Scattered);
    }

    #[test]
    fn test_targets_and_labels() {
        assert_eq!(MorphState::Scattered.target(), 0.0);
        assert_eq!(MorphState::Assembled.target(), 1.0);
        assert_eq!(MorphState::Scattered.action_label(), "Assemble Tree");
        assert_eq!(MorphState::Assembled.action_label(), "Scatter Particles");
    }
}
