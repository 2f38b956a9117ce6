use crate::core::{DecisionConfig, DecisionRecord, Temperatures, Verdict};

use super::calibration::BaselineProfile;

/// One valid heart-rate reading with its temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub hr: f64,
    pub temps: Temperatures,
    pub timestamp: u64,
}

/// Flags deception when heart rate rises or skin temperature drops past fixed
/// margins over the baseline. Either indicator alone is enough.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    hr_elevation_factor: f64,
    temp_drop_c: f64,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::from_config(&DecisionConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(hr_elevation_factor: f64, temp_drop_c: f64) -> Self {
        Self {
            hr_elevation_factor,
            temp_drop_c,
        }
    }

    pub fn from_config(config: &DecisionConfig) -> Self {
        Self::new(config.hr_elevation_factor, config.temp_drop_c)
    }

    /// `(hr_threshold, temp_threshold)` for a baseline.
    pub fn thresholds(&self, baseline: &BaselineProfile) -> (f64, f64) {
        (
            baseline.hr_baseline * self.hr_elevation_factor,
            baseline.temp_baseline - self.temp_drop_c,
        )
    }

    /// Requires `baseline.is_set`.
    pub fn evaluate(&self, reading: &Reading, baseline: &BaselineProfile) -> DecisionRecord {
        debug_assert!(baseline.is_set, "decision requested before calibration");

        let (hr_threshold, temp_threshold) = self.thresholds(baseline);
        let temp_avg = reading.temps.average;

        let mut reasons = Vec::new();
        if reading.hr > hr_threshold {
            reasons.push(format!("Elevated heart rate ({:.1} bpm)", reading.hr));
        }
        if temp_avg < temp_threshold {
            reasons.push(format!("Low temperature ({:.1} °C)", temp_avg));
        }

        let verdict = if reasons.is_empty() {
            Verdict::Truthful
        } else {
            Verdict::Deceptive
        };

        DecisionRecord {
            verdict,
            reasons,
            hr: reading.hr,
            temp_avg,
            temp1: reading.temps.temp1,
            temp2: reading.temps.temp2,
            timestamp: reading.timestamp,
        }
    }
}
