use polygraph::core::{PipelineConfig, Temperatures, WindowPolicy};
use serde_json::json;
use std::io::Write;

#[test]
fn test_empty_json_uses_defaults() {
    let config = PipelineConfig::from_json(json!({})).unwrap();
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.sample_rate_hz, 333.0);
    assert_eq!(config.calibration.samples, 10);
    assert_eq!(config.detector.refractory_s, 0.5);
}

#[test]
fn test_partial_sections_merge_with_defaults() {
    let config = PipelineConfig::from_json(json!({
        "window": { "mode": "fixed", "compute_after": 9990, "reset_after": 19980 },
        "decision": { "temp_drop_c": 1.0 }
    }))
    .unwrap();

    assert_eq!(
        config.window,
        WindowPolicy::Fixed {
            compute_after: 9990,
            reset_after: 19980
        }
    );
    assert_eq!(config.decision.temp_drop_c, 1.0);
    assert_eq!(config.decision.hr_elevation_factor, 1.20);
}

#[test]
fn test_validation_errors() {
    let cases = [
        json!({ "sample_rate_hz": 0.0 }),
        json!({ "filter": { "lowpass_cutoff_hz": 170.0 } }),
        json!({ "filter": { "lowpass_order": 3 } }),
        json!({ "calibration": { "samples": 0 } }),
        json!({ "window": { "mode": "sliding", "capacity": 100, "min_samples": 200 } }),
        json!({ "window": { "mode": "fixed", "compute_after": 10, "reset_after": 10 } }),
        json!({ "detector": { "kind": "unknown" } }),
        json!({ "ingest": { "channel_capacity": 0 } }),
    ];

    for case in cases {
        assert!(PipelineConfig::from_json(case.clone()).is_err(), "{}", case);
    }
}

#[test]
fn test_disabled_filter_skips_filter_checks() {
    let config = PipelineConfig::from_json(json!({
        "filter": { "enabled": false, "lowpass_cutoff_hz": 500.0 }
    }));
    assert!(config.is_ok());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "sample_rate_hz": 250.0, "hrv": {{ "pnn_threshold_ms": 20.0 }} }}"#).unwrap();

    let config = PipelineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.sample_rate_hz, 250.0);
    assert_eq!(config.hrv.pnn_threshold_ms, 20.0);
}

#[test]
fn test_temperature_sentinel() {
    let temps = Temperatures::resolve(-127.0, 33.0, -127.0);
    assert!(!temps.connected);
    assert_eq!((temps.temp1, temps.temp2, temps.average), (0.0, 0.0, 0.0));

    let temps = Temperatures::resolve(33.0, 34.0, -127.0);
    assert!(temps.connected);
    assert_eq!(temps.average, 33.5);
}
