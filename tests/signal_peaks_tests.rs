use polygraph::signal::{AdaptiveThresholdDetector, GradientQrsDetector, PeakDetector, PeakSet};
use polygraph::transport::SimulatedSensor;

const FS: f64 = 333.0;

fn simulated_window(bpm: f64, len: usize) -> Vec<f64> {
    let mut sensor = SimulatedSensor::new(FS, len).with_bpm(bpm);
    sensor.generate().ecg
}

fn spikes(positions: &[usize], len: usize) -> Vec<f64> {
    let mut x = vec![0.0; len];
    for &p in positions {
        x[p] = 1.0;
    }
    x
}

#[test]
fn test_all_zero_window_has_no_peaks() {
    let detector = AdaptiveThresholdDetector::default();
    assert!(detector.find_peaks(&vec![0.0; 2000], FS).is_empty());

    let qrs = GradientQrsDetector::default();
    assert!(qrs.find_peaks(&vec![0.0; 2000], FS).is_empty());
}

#[test]
fn test_short_window_has_no_peaks() {
    let detector = AdaptiveThresholdDetector::default();
    assert!(detector.find_peaks(&[], FS).is_empty());
    assert!(detector.find_peaks(&[1.0, 2.0], FS).is_empty());
}

#[test]
fn test_spikes_are_found() {
    let detector = AdaptiveThresholdDetector::default();
    let peaks = detector.find_peaks(&spikes(&[100, 400, 700], 1000), FS);
    assert_eq!(peaks.as_slice(), &[100, 400, 700]);
}

#[test]
fn test_refractory_period_keeps_taller_peak() {
    let detector = AdaptiveThresholdDetector::new(0.5);
    let mut x = spikes(&[100, 400], 1000);
    x[450] = 2.0;

    // 166-sample refractory period at 333 Hz
    let peaks = detector.find_peaks(&x, FS);
    assert_eq!(peaks.as_slice(), &[100, 450]);
}

#[test]
fn test_peaks_strictly_increasing() {
    let detector = AdaptiveThresholdDetector::default();
    let peaks = detector.find_peaks(&simulated_window(72.0, 2000), FS);

    assert!(peaks.len() >= 6);
    assert!(peaks.as_slice().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_adaptive_detector_follows_rhythm() {
    let detector = AdaptiveThresholdDetector::default();
    let peaks = detector.find_peaks(&simulated_window(72.0, 2000), FS);

    // 72 bpm at 333 Hz: one beat every 277.5 samples
    for w in peaks.as_slice().windows(2) {
        let rr = w[1] - w[0];
        assert!((276..=279).contains(&rr), "rr {}", rr);
    }
}

#[test]
fn test_gradient_qrs_follows_rhythm() {
    let detector = GradientQrsDetector::default();
    let peaks = detector.find_peaks(&simulated_window(100.0, 2000), FS);

    assert!(peaks.len() >= 8);
    let rr: Vec<usize> = peaks.as_slice().windows(2).map(|w| w[1] - w[0]).collect();
    let inner = &rr[1..rr.len() - 1];
    assert!(inner.iter().all(|&r| (195..=205).contains(&r)), "rr {:?}", rr);
}

#[test]
fn test_detector_ids() {
    assert_eq!(AdaptiveThresholdDetector::default().id(), "adaptive");
    assert_eq!(GradientQrsDetector::default().id(), "gradient_qrs");
}

#[test]
fn test_peak_set_normalises_indices() {
    let peaks = PeakSet::from_indices(vec![30, 10, 20, 10]);
    assert_eq!(peaks.as_slice(), &[10, 20, 30]);
    assert_eq!((&peaks).into_iter().count(), 3);
}
