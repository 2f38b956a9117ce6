pub mod error;
pub mod filter;
pub mod hrv;
pub mod peaks;
pub mod qrs;

pub use error::SignalError;
pub use filter::{Biquad, Cascade, EcgFilter, FilteredSignal};
pub use hrv::{HrvCalculator, HrvMetrics, RrIntervals};
pub use peaks::{AdaptiveThresholdDetector, PeakDetector, PeakSet};
pub use qrs::GradientQrsDetector;
