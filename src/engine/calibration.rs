//! Personal baseline: the mean of the first `N` plausible heart-rate /
//! temperature readings, frozen for the rest of the session.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    pub hr_baseline: f64,
    pub temp_baseline: f64,
    pub is_set: bool,
}

/// What one observation did to the calibrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// Heart rate not plausible; nothing recorded
    Rejected,
    Collecting { collected: usize, required: usize },
    /// The `required`-th sample just arrived and the baseline is now frozen
    Established {
        profile: BaselineProfile,
        required: usize,
    },
    /// Baseline already frozen; observation ignored
    Frozen,
}

#[derive(Debug, Clone)]
pub struct BaselineCalibrator {
    required: usize,
    hr_samples: Vec<f64>,
    temp_samples: Vec<f64>,
    profile: BaselineProfile,
}

impl BaselineCalibrator {
    pub fn new(required: usize) -> Self {
        let required = required.max(1);
        Self {
            required,
            hr_samples: Vec::with_capacity(required),
            temp_samples: Vec::with_capacity(required),
            profile: BaselineProfile::default(),
        }
    }

    pub fn observe(&mut self, hr: f64, temp_avg: f64) -> CalibrationStep {
        if self.profile.is_set {
            return CalibrationStep::Frozen;
        }
        if !(hr.is_finite() && hr > 0.0) {
            debug!(hr, "calibration sample rejected");
            return CalibrationStep::Rejected;
        }

        self.hr_samples.push(hr);
        self.temp_samples.push(temp_avg);

        let collected = self.hr_samples.len();
        if collected < self.required {
            return CalibrationStep::Collecting {
                collected,
                required: self.required,
            };
        }

        self.profile = BaselineProfile {
            hr_baseline: mean(&self.hr_samples),
            temp_baseline: mean(&self.temp_samples),
            is_set: true,
        };
        self.hr_samples.clear();
        self.temp_samples.clear();

        info!(
            hr_baseline = self.profile.hr_baseline,
            temp_baseline = self.profile.temp_baseline,
            "baseline established"
        );

        CalibrationStep::Established {
            profile: self.profile,
            required: self.required,
        }
    }

    pub fn profile(&self) -> &BaselineProfile {
        &self.profile
    }

    pub fn is_frozen(&self) -> bool {
        self.profile.is_set
    }

    pub fn collected(&self) -> usize {
        self.hr_samples.len()
    }

    pub fn required(&self) -> usize {
        self.required
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
