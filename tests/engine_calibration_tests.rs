use polygraph::engine::{BaselineCalibrator, CalibrationStep};

#[test]
fn test_freezes_exactly_on_nth_sample() {
    let mut calibrator = BaselineCalibrator::new(10);

    for i in 1..10 {
        let step = calibrator.observe(70.0 + i as f64, 33.0);
        assert_eq!(
            step,
            CalibrationStep::Collecting {
                collected: i,
                required: 10
            }
        );
        assert!(!calibrator.is_frozen());
        assert!(!calibrator.profile().is_set);
    }

    let step = calibrator.observe(80.0, 33.0);
    assert!(matches!(step, CalibrationStep::Established { required: 10, .. }));
    assert!(calibrator.is_frozen());

    let profile = calibrator.profile();
    // mean of 71..=79 and 80
    assert!((profile.hr_baseline - 75.5).abs() < 1e-9);
    assert!((profile.temp_baseline - 33.0).abs() < 1e-9);
}

#[test]
fn test_frozen_baseline_never_changes() {
    let mut calibrator = BaselineCalibrator::new(2);
    calibrator.observe(60.0, 32.0);
    calibrator.observe(80.0, 34.0);
    let frozen = *calibrator.profile();

    for _ in 0..5 {
        assert_eq!(calibrator.observe(150.0, 20.0), CalibrationStep::Frozen);
    }
    assert_eq!(*calibrator.profile(), frozen);
    assert!((frozen.hr_baseline - 70.0).abs() < 1e-9);
    assert!((frozen.temp_baseline - 33.0).abs() < 1e-9);
}

#[test]
fn test_invalid_heart_rate_is_not_collected() {
    let mut calibrator = BaselineCalibrator::new(3);

    assert_eq!(calibrator.observe(0.0, 33.0), CalibrationStep::Rejected);
    assert_eq!(calibrator.observe(-5.0, 33.0), CalibrationStep::Rejected);
    assert_eq!(calibrator.observe(f64::NAN, 33.0), CalibrationStep::Rejected);
    assert_eq!(calibrator.collected(), 0);

    calibrator.observe(72.0, 33.0);
    assert_eq!(calibrator.collected(), 1);
}

#[test]
fn test_disconnected_temperature_still_counts() {
    let mut calibrator = BaselineCalibrator::new(2);
    calibrator.observe(70.0, 0.0);
    calibrator.observe(70.0, 34.0);

    assert!((calibrator.profile().temp_baseline - 17.0).abs() < 1e-9);
}
