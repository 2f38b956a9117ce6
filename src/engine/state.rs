use serde::{Deserialize, Serialize};

/// Session phases of the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    /// Filling the first analysis window
    Accumulating { progress: u8 }, // 0-100
    /// Collecting valid readings for the baseline
    Calibrating { collected: usize, required: usize },
    /// Baseline frozen; every valid reading is judged
    Analyzing { decisions: u64 },
}

impl PipelineState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, target),
            // Progress updates within a phase
            (Accumulating { .. }, Accumulating { .. }) |
            (Calibrating { .. }, Calibrating { .. }) |
            (Analyzing { .. }, Analyzing { .. }) |

            // Forward only
            (Accumulating { .. }, Calibrating { .. }) |
            (Calibrating { .. }, Analyzing { .. })
        )
    }

    /// Get human-readable state name
    pub fn name(&self) -> &str {
        match self {
            Self::Accumulating { .. } => "Accumulating",
            Self::Calibrating { .. } => "Calibrating",
            Self::Analyzing { .. } => "Analyzing",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Accumulating { progress: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let accumulating = PipelineState::Accumulating { progress: 50 };
        let calibrating = PipelineState::Calibrating {
            collected: 0,
            required: 10,
        };

        assert!(accumulating.can_transition_to(&calibrating));
        assert!(!calibrating.can_transition_to(&accumulating));
    }

    #[test]
    fn test_calibration_cannot_be_skipped() {
        let accumulating = PipelineState::default();
        let analyzing = PipelineState::Analyzing { decisions: 0 };

        assert!(!accumulating.can_transition_to(&analyzing));
    }

    #[test]
    fn test_analyzing_is_terminal() {
        let analyzing = PipelineState::Analyzing { decisions: 3 };

        assert!(analyzing.can_transition_to(&PipelineState::Analyzing { decisions: 4 }));
        assert!(!analyzing.can_transition_to(&PipelineState::default()));
        assert!(!analyzing.can_transition_to(&PipelineState::Calibrating {
            collected: 0,
            required: 10
        }));
    }
}
