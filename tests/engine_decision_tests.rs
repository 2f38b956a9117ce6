use polygraph::core::{Temperatures, Verdict};
use polygraph::engine::{BaselineProfile, DecisionEngine, Reading};

fn baseline() -> BaselineProfile {
    BaselineProfile {
        hr_baseline: 80.0,
        temp_baseline: 32.0,
        is_set: true,
    }
}

fn reading(hr: f64, temp_avg: f64) -> Reading {
    Reading {
        hr,
        temps: Temperatures::resolve(temp_avg, temp_avg, -127.0),
        timestamp: 1_700_000_000_000,
    }
}

#[test]
fn test_both_indicators_deceptive() {
    let record = DecisionEngine::default().evaluate(&reading(100.0, 31.0), &baseline());

    assert_eq!(record.verdict, Verdict::Deceptive);
    assert_eq!(record.reasons.len(), 2);
    assert!(record.reasons[0].contains("heart rate"));
    assert!(record.reasons[1].contains("temperature"));
    assert_eq!(record.timestamp, 1_700_000_000_000);
}

#[test]
fn test_within_thresholds_truthful() {
    let record = DecisionEngine::default().evaluate(&reading(85.0, 32.0), &baseline());

    assert_eq!(record.verdict, Verdict::Truthful);
    assert!(record.reasons.is_empty());
    assert_eq!(record.temp_avg, 32.0);
}

#[test]
fn test_single_indicator_is_enough() {
    let engine = DecisionEngine::default();

    let hr_only = engine.evaluate(&reading(97.0, 32.0), &baseline());
    assert_eq!(hr_only.verdict, Verdict::Deceptive);
    assert_eq!(hr_only.reasons, vec!["Elevated heart rate (97.0 bpm)".to_string()]);

    let temp_only = engine.evaluate(&reading(80.0, 31.4), &baseline());
    assert_eq!(temp_only.verdict, Verdict::Deceptive);
    assert_eq!(temp_only.reasons, vec!["Low temperature (31.4 °C)".to_string()]);
}

#[test]
fn test_thresholds_are_strict() {
    let engine = DecisionEngine::default();
    let (hr_threshold, temp_threshold) = engine.thresholds(&baseline());
    assert!((hr_threshold - 96.0).abs() < 1e-9);
    assert!((temp_threshold - 31.5).abs() < 1e-9);

    let record = engine.evaluate(&reading(96.0, 31.5), &baseline());
    assert_eq!(record.verdict, Verdict::Truthful);
}

#[test]
fn test_custom_margins() {
    let engine = DecisionEngine::new(1.5, 2.0);
    let record = engine.evaluate(&reading(110.0, 30.5), &baseline());
    assert_eq!(record.verdict, Verdict::Truthful);
}

#[test]
fn test_evaluate_is_pure() {
    let engine = DecisionEngine::default();
    let r = reading(100.0, 31.0);
    assert_eq!(engine.evaluate(&r, &baseline()), engine.evaluate(&r, &baseline()));
}
