use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::core::DetectorConfig;
use crate::signal::{AdaptiveThresholdDetector, GradientQrsDetector, PeakDetector};

/// Factory function type for building a detector from its configuration
pub type DetectorFactory = fn(&DetectorConfig) -> Box<dyn PeakDetector>;

/// A selectable peak-detection variant
pub struct DetectorRegistration {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub factory: DetectorFactory,
}

inventory::collect!(DetectorRegistration);

fn build_adaptive(config: &DetectorConfig) -> Box<dyn PeakDetector> {
    Box::new(AdaptiveThresholdDetector::new(config.refractory_s))
}

fn build_gradient_qrs(_config: &DetectorConfig) -> Box<dyn PeakDetector> {
    Box::new(GradientQrsDetector::new())
}

inventory::submit! {
    DetectorRegistration {
        id: "adaptive",
        name: "Adaptive threshold",
        description: "Local maxima above the window mean with a refractory distance",
        factory: build_adaptive,
    }
}

inventory::submit! {
    DetectorRegistration {
        id: "gradient_qrs",
        name: "Gradient QRS",
        description: "QRS regions from smoothed slope energy, tallest maximum per region",
        factory: build_gradient_qrs,
    }
}

/// Serializable listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

pub fn find_detector(id: &str) -> Option<&'static DetectorRegistration> {
    inventory::iter::<DetectorRegistration>
        .into_iter()
        .find(|r| r.id == id)
}

pub fn create_detector(config: &DetectorConfig) -> Result<Box<dyn PeakDetector>> {
    let registration =
        find_detector(&config.kind).ok_or(anyhow!("Unknown detector type: {}", config.kind))?;
    Ok((registration.factory)(config))
}

/// All registered detectors, sorted by id.
pub fn available_detectors() -> Vec<DetectorInfo> {
    let mut list: Vec<DetectorInfo> = inventory::iter::<DetectorRegistration>
        .into_iter()
        .map(|r| DetectorInfo {
            id: r.id.to_string(),
            name: r.name.to_string(),
            description: r.description.to_string(),
        })
        .collect();
    list.sort_by(|a, b| a.id.cmp(&b.id));
    list
}
