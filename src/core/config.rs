use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::batch::TEMP_DISCONNECTED;

/// Complete pipeline configuration. Every field has a default, so `{}` is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sample_rate_hz: f64,
    pub window: WindowPolicy,
    pub filter: FilterConfig,
    pub detector: DetectorConfig,
    pub hrv: HrvConfig,
    pub calibration: CalibrationConfig,
    pub decision: DecisionConfig,
    pub temperature: TemperatureConfig,
    pub ingest: IngestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 333.0,
            window: WindowPolicy::default(),
            filter: FilterConfig::default(),
            detector: DetectorConfig::default(),
            hrv: HrvConfig::default(),
            calibration: CalibrationConfig::default(),
            decision: DecisionConfig::default(),
            temperature: TemperatureConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(config: Value) -> Result<Self> {
        let config: Self =
            serde_json::from_value(config).context("Invalid pipeline configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Config {} is not valid JSON", path.display()))?;
        Self::from_json(value)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            bail!("sample_rate_hz must be positive, got {}", self.sample_rate_hz);
        }

        match self.window {
            WindowPolicy::Sliding {
                capacity,
                min_samples,
            } => {
                if capacity == 0 {
                    bail!("window.capacity must be at least 1");
                }
                if min_samples > capacity {
                    bail!(
                        "window.min_samples ({}) exceeds window.capacity ({})",
                        min_samples,
                        capacity
                    );
                }
            }
            WindowPolicy::Fixed {
                compute_after,
                reset_after,
            } => {
                if compute_after == 0 {
                    bail!("window.compute_after must be at least 1");
                }
                if reset_after <= compute_after {
                    bail!(
                        "window.reset_after ({}) must exceed window.compute_after ({})",
                        reset_after,
                        compute_after
                    );
                }
            }
        }

        let nyquist = self.sample_rate_hz / 2.0;
        if self.filter.enabled {
            if !(self.filter.mains_hz > 0.0 && self.filter.mains_hz < nyquist) {
                bail!(
                    "filter.mains_hz must lie in (0, {}), got {}",
                    nyquist,
                    self.filter.mains_hz
                );
            }
            if !(self.filter.lowpass_cutoff_hz > 0.0 && self.filter.lowpass_cutoff_hz < nyquist) {
                bail!(
                    "filter.lowpass_cutoff_hz must lie in (0, {}), got {}",
                    nyquist,
                    self.filter.lowpass_cutoff_hz
                );
            }
            if self.filter.notch_q <= 0.0 {
                bail!("filter.notch_q must be positive");
            }
            if self.filter.lowpass_order == 0 || self.filter.lowpass_order % 2 != 0 {
                bail!(
                    "filter.lowpass_order must be a positive even number, got {}",
                    self.filter.lowpass_order
                );
            }
        }

        if self.detector.refractory_s <= 0.0 {
            bail!("detector.refractory_s must be positive");
        }
        if crate::registry::find_detector(&self.detector.kind).is_none() {
            return Err(anyhow!("Unknown detector type: {}", self.detector.kind));
        }

        if self.hrv.pnn_threshold_ms <= 0.0 {
            bail!("hrv.pnn_threshold_ms must be positive");
        }
        if self.calibration.samples == 0 {
            bail!("calibration.samples must be at least 1");
        }
        if self.decision.hr_elevation_factor <= 0.0 {
            bail!("decision.hr_elevation_factor must be positive");
        }
        if self.ingest.channel_capacity == 0 {
            bail!("ingest.channel_capacity must be at least 1");
        }

        Ok(())
    }
}

/// How raw samples are windowed before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Keep the most recent `capacity` samples; analyse on every batch once
    /// `min_samples` are held.
    Sliding { capacity: usize, min_samples: usize },

    /// Accumulate; analyse the first `compute_after` samples once, then clear
    /// everything when `reset_after` samples have arrived.
    Fixed {
        compute_after: usize,
        reset_after: usize,
    },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::Sliding {
            capacity: 2000,
            min_samples: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    pub mains_hz: f64,
    pub notch_q: f64,
    pub lowpass_cutoff_hz: f64,
    pub lowpass_order: usize,
    /// Mean-centre and scale into [-1, 1] after filtering
    pub normalize: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mains_hz: 60.0,
            notch_q: 30.0,
            lowpass_cutoff_hz: 100.0,
            lowpass_order: 4,
            normalize: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Registry id of the peak detector
    pub kind: String,
    pub refractory_s: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kind: "adaptive".to_string(),
            refractory_s: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrvConfig {
    pub pnn_threshold_ms: f64,
}

impl Default for HrvConfig {
    fn default() -> Self {
        Self {
            pnn_threshold_ms: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub samples: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { samples: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub hr_elevation_factor: f64,
    pub temp_drop_c: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            hr_elevation_factor: 1.20,
            temp_drop_c: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    pub disconnected_sentinel: f64,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            disconnected_sentinel: TEMP_DISCONNECTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub channel_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
        }
    }
}
