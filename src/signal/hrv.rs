//! Heart-rate variability from R-peak positions.
//!
//! All metrics are zero when there are not enough peaks; non-finite results are
//! coerced to zero before they leave this module.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::peaks::PeakSet;

/// Time between consecutive peaks, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RrIntervals(Vec<f64>);

impl RrIntervals {
    pub fn from_peaks(peaks: &PeakSet, sample_rate: f64) -> Self {
        let times: Vec<f64> = peaks
            .as_slice()
            .iter()
            .map(|&p| p as f64 / sample_rate * 1000.0)
            .collect();
        Self(times.windows(2).map(|w| w[1] - w[0]).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn sdnn(&self) -> Option<f64> {
        let mean = self.mean()?;
        if self.0.len() < 2 {
            return None;
        }
        let ss: f64 = self.0.iter().map(|rr| (rr - mean).powi(2)).sum();
        Some((ss / (self.0.len() - 1) as f64).sqrt())
    }

    pub fn successive_differences(&self) -> Vec<f64> {
        self.0.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HrvMetrics {
    pub bpm: f64,
    pub sdnn: f64,
    pub rmssd: f64,
    pub pnn50: f64,
}

impl HrvMetrics {
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when a heart rate could be derived (at least two peaks).
    pub fn has_heart_rate(&self) -> bool {
        self.bpm > 0.0
    }

    fn sanitized(self) -> (Self, bool) {
        let clean = |v: f64| if v.is_finite() && v >= 0.0 { v } else { 0.0 };
        let out = Self {
            bpm: clean(self.bpm),
            sdnn: clean(self.sdnn),
            rmssd: clean(self.rmssd),
            pnn50: clean(self.pnn50),
        };
        (out, out != self)
    }
}

/// Stateless: identical inputs always give identical metrics.
#[derive(Debug, Clone)]
pub struct HrvCalculator {
    pnn_threshold_ms: f64,
}

impl Default for HrvCalculator {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl HrvCalculator {
    pub fn new(pnn_threshold_ms: f64) -> Self {
        Self { pnn_threshold_ms }
    }

    pub fn compute(&self, peaks: &PeakSet, sample_rate: f64) -> HrvMetrics {
        if peaks.len() < 2 || !sample_rate.is_finite() || sample_rate <= 0.0 {
            return HrvMetrics::zero();
        }

        let rr = RrIntervals::from_peaks(peaks, sample_rate);
        let Some(mean_rr) = rr.mean() else {
            return HrvMetrics::zero();
        };

        let diffs = rr.successive_differences();
        let (rmssd, pnn50) = if diffs.is_empty() {
            (0.0, 0.0)
        } else {
            let n = diffs.len() as f64;
            let rmssd = (diffs.iter().map(|d| d * d).sum::<f64>() / n).sqrt();
            let over = diffs
                .iter()
                .filter(|d| d.abs() > self.pnn_threshold_ms)
                .count();
            (rmssd, 100.0 * over as f64 / n)
        };

        let raw = HrvMetrics {
            bpm: 60_000.0 / mean_rr,
            sdnn: rr.sdnn().unwrap_or(0.0),
            rmssd,
            pnn50,
        };

        let (metrics, coerced) = raw.sanitized();
        if coerced {
            warn!(?raw, "non-finite HRV metrics coerced to zero");
        }
        metrics
    }
}
