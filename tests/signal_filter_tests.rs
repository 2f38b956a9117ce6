use polygraph::core::FilterConfig;
use polygraph::signal::{Cascade, EcgFilter, SignalError};
use std::f64::consts::PI;

const FS: f64 = 333.0;

fn sine(freq: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| (2.0 * PI * freq * i as f64 / FS).sin()).collect()
}

fn rms(x: &[f64]) -> f64 {
    (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}

#[test]
fn test_default_filter_design() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    assert!(filter.is_enabled());
    assert!(filter.min_len() > 0);
}

#[test]
fn test_design_rejects_cutoff_above_nyquist() {
    let config = FilterConfig {
        lowpass_cutoff_hz: 200.0,
        ..FilterConfig::default()
    };
    assert!(matches!(
        EcgFilter::design(&config, FS),
        Err(SignalError::InvalidDesign(_))
    ));
}

#[test]
fn test_mains_hum_is_suppressed() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let hum = sine(60.0, 2000);

    let out = filter.apply(&hum);
    assert!(!out.fell_back);
    assert!(rms(&out.samples[200..1800]) < 0.05 * rms(&hum));
}

#[test]
fn test_heartbeat_band_passes() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let beat = sine(5.0, 2000);

    let out = filter.apply(&beat);
    let ratio = rms(&out.samples[200..1800]) / rms(&beat[200..1800]);
    assert!((ratio - 1.0).abs() < 0.05, "ratio {}", ratio);
}

#[test]
fn test_lowpass_cutoff_halves_amplitude() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let tone = sine(100.0, 2000);

    let out = filter.apply(&tone);
    let ratio = rms(&out.samples[200..1800]) / rms(&tone[200..1800]);
    assert!((0.45..0.55).contains(&ratio), "ratio {}", ratio);
}

#[test]
fn test_impulse_peak_is_not_shifted() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let mut impulse = vec![0.0; 2000];
    impulse[1000] = 1.0;

    let out = filter.apply(&impulse);
    let argmax = out
        .samples
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |(i, m), (j, &v)| if v > m { (j, v) } else { (i, m) })
        .0;
    assert_eq!(argmax, 1000);
}

#[test]
fn test_output_length_matches_input() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let window = sine(1.2, 2000);
    assert_eq!(filter.apply(&window).len(), 2000);
}

#[test]
fn test_too_short_window_falls_back_to_raw() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let window = vec![0.5, 0.7, 0.6];

    assert!(matches!(
        filter.try_apply(&window),
        Err(SignalError::WindowTooShort { .. })
    ));

    let out = filter.apply(&window);
    assert!(out.fell_back);
    assert_eq!(out.samples, window);
}

#[test]
fn test_disabled_filter_is_identity() {
    let config = FilterConfig {
        enabled: false,
        ..FilterConfig::default()
    };
    let filter = EcgFilter::design(&config, FS).unwrap();
    let window = sine(60.0, 100);

    let out = filter.apply(&window);
    assert!(!out.fell_back);
    assert_eq!(out.samples, window);
}

#[test]
fn test_non_finite_input_falls_back() {
    let filter = EcgFilter::design(&FilterConfig::default(), FS).unwrap();
    let mut window = sine(1.0, 500);
    window[100] = f64::NAN;

    assert!(matches!(filter.try_apply(&window), Err(SignalError::NonFinite)));
    assert!(filter.apply(&window).fell_back);
}

#[test]
fn test_butterworth_rejects_odd_order() {
    assert!(Cascade::butterworth_lowpass(3, 100.0, FS).is_err());
    assert_eq!(Cascade::butterworth_lowpass(4, 100.0, FS).unwrap().sections().len(), 2);
}
