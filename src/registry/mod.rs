pub mod detectors;

pub use detectors::{
    available_detectors, create_detector, find_detector, DetectorFactory, DetectorInfo,
    DetectorRegistration,
};
