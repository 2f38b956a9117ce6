//! Zero-phase ECG conditioning: a mains notch followed by a Butterworth low-pass.
//!
//! Both stages run forward and backward over the window through `sci_rs`
//! (`sosfiltfilt_dyn`) so R-peak timing is not shifted.

use sci_rs::signal::filter::design::{
    butter_dyn, DigitalFilter, FilterBandType, FilterOutputType, Sos,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;
use std::f64::consts::PI;
use tracing::warn;

use super::SignalError;
use crate::core::FilterConfig;

/// Second-order IIR section, normalised so that `a[0] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl Biquad {
    /// Band-reject section centred on `freq_hz` with quality factor `q`.
    pub fn notch(freq_hz: f64, q: f64, sample_rate: f64) -> Result<Self, SignalError> {
        let nyquist = sample_rate / 2.0;
        if !(freq_hz > 0.0 && freq_hz < nyquist) {
            return Err(SignalError::InvalidDesign(format!(
                "notch frequency {} Hz outside (0, {}) Hz",
                freq_hz, nyquist
            )));
        }
        if q <= 0.0 {
            return Err(SignalError::InvalidDesign(format!(
                "notch quality factor must be positive, got {}",
                q
            )));
        }

        let w0 = freq_hz / nyquist;
        let bw = (w0 / q) * PI;
        let w0 = w0 * PI;

        let beta = (bw / 2.0).tan();
        let gain = 1.0 / (1.0 + beta);
        let cos_w0 = w0.cos();

        Ok(Self {
            b: [gain, -2.0 * gain * cos_w0, gain],
            a: [1.0, -2.0 * gain * cos_w0, 2.0 * gain - 1.0],
        })
    }

    pub fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (self.a[0] + self.a[1] + self.a[2])
    }

    fn to_sos(self) -> Sos<f64> {
        Sos::new(self.b, self.a)
    }
}

/// Chain of second-order sections applied in order.
#[derive(Debug, Clone)]
pub struct Cascade {
    sections: Vec<Sos<f64>>,
}

impl Cascade {
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn from_biquads(sections: &[Biquad]) -> Self {
        Self {
            sections: sections.iter().map(|s| s.to_sos()).collect(),
        }
    }

    /// Even-order digital Butterworth low-pass, `order / 2` sections.
    pub fn butterworth_lowpass(
        order: usize,
        cutoff_hz: f64,
        sample_rate: f64,
    ) -> Result<Self, SignalError> {
        if order == 0 || order % 2 != 0 {
            return Err(SignalError::InvalidDesign(format!(
                "Butterworth order must be a positive even number, got {}",
                order
            )));
        }
        let nyquist = sample_rate / 2.0;
        if !(cutoff_hz > 0.0 && cutoff_hz < nyquist) {
            return Err(SignalError::InvalidDesign(format!(
                "low-pass cutoff {} Hz outside (0, {}) Hz",
                cutoff_hz, nyquist
            )));
        }

        let design = butter_dyn(
            order,
            vec![cutoff_hz],
            Some(FilterBandType::Lowpass),
            Some(false),
            Some(FilterOutputType::Sos),
            Some(sample_rate),
        );
        match design {
            DigitalFilter::Sos(filter) => Ok(Self {
                sections: filter.sos,
            }),
            _ => Err(SignalError::InvalidDesign(
                "Butterworth design did not produce second-order sections".to_string(),
            )),
        }
    }

    pub fn sections(&self) -> &[Sos<f64>] {
        &self.sections
    }

    /// Samples of odd-extension padding on each side.
    pub fn padlen(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Forward-backward filtering. Fails when the input is not longer than the
    /// padding or when either input or output is not finite.
    pub fn filtfilt(&self, x: &[f64]) -> Result<Vec<f64>, SignalError> {
        if self.sections.is_empty() {
            return Ok(x.to_vec());
        }

        let padlen = self.padlen();
        if x.len() <= padlen {
            return Err(SignalError::WindowTooShort {
                len: x.len(),
                required: padlen + 1,
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite);
        }

        let out: Vec<f64> = sosfiltfilt_dyn(x.iter(), &self.sections);
        if out.len() != x.len() || out.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite);
        }
        Ok(out)
    }
}

/// Output of [`EcgFilter::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSignal {
    pub samples: Vec<f64>,
    /// The filter could not run and `samples` is the unfiltered window
    pub fell_back: bool,
}

impl FilteredSignal {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Mains notch plus low-pass, designed once for a fixed sample rate.
#[derive(Debug, Clone)]
pub struct EcgFilter {
    notch: Cascade,
    lowpass: Cascade,
    enabled: bool,
    normalize: bool,
}

impl EcgFilter {
    pub fn design(config: &FilterConfig, sample_rate: f64) -> Result<Self, SignalError> {
        if !config.enabled {
            return Ok(Self {
                notch: Cascade::empty(),
                lowpass: Cascade::empty(),
                enabled: false,
                normalize: config.normalize,
            });
        }

        let notch = Biquad::notch(config.mains_hz, config.notch_q, sample_rate)?;
        let lowpass = Cascade::butterworth_lowpass(
            config.lowpass_order,
            config.lowpass_cutoff_hz,
            sample_rate,
        )?;

        Ok(Self {
            notch: Cascade::from_biquads(&[notch]),
            lowpass,
            enabled: true,
            normalize: config.normalize,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Shortest window both stages accept.
    pub fn min_len(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        self.notch.padlen().max(self.lowpass.padlen()) + 1
    }

    pub fn try_apply(&self, window: &[f64]) -> Result<Vec<f64>, SignalError> {
        if !self.enabled {
            return Ok(window.to_vec());
        }
        let notched = self.notch.filtfilt(window)?;
        self.lowpass.filtfilt(&notched)
    }

    /// Best-effort filtering: any failure hands back the window unchanged.
    pub fn apply(&self, window: &[f64]) -> FilteredSignal {
        let (mut samples, fell_back) = match self.try_apply(window) {
            Ok(samples) => (samples, false),
            Err(e) => {
                warn!(error = %e, len = window.len(), "filter failed, using unfiltered window");
                (window.to_vec(), true)
            }
        };

        if self.normalize {
            normalize(&mut samples);
        }

        FilteredSignal { samples, fell_back }
    }
}

/// Subtract the mean and scale by the largest magnitude into [-1, 1].
pub fn normalize(samples: &mut [f64]) {
    if samples.is_empty() {
        return;
    }

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    for s in samples.iter_mut() {
        *s -= mean;
    }

    let peak = samples.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
    if peak > 0.0 && peak.is_finite() {
        for s in samples.iter_mut() {
            *s /= peak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_notch_has_unity_dc_gain() {
        let notch = Biquad::notch(60.0, 30.0, 333.0).unwrap();
        assert!((notch.dc_gain() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_butterworth_sections() {
        let lp = Cascade::butterworth_lowpass(4, 100.0, 333.0).unwrap();
        assert_eq!(lp.sections().len(), 2);
        assert_eq!(lp.padlen(), 15);
        assert!(Cascade::butterworth_lowpass(3, 100.0, 333.0).is_err());
        assert!(Cascade::butterworth_lowpass(4, 200.0, 333.0).is_err());
    }

    #[test]
    fn test_notch_removes_mains() {
        let x = sine(60.0, 333.0, 2000);
        let y = Cascade::from_biquads(&[Biquad::notch(60.0, 30.0, 333.0).unwrap()])
            .filtfilt(&x)
            .unwrap();

        let peak = y[500..1500].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!(peak < 0.05, "residual mains amplitude {}", peak);
    }

    #[test]
    fn test_filtfilt_keeps_constant() {
        let x = vec![2.5; 300];
        let y = Cascade::butterworth_lowpass(4, 100.0, 333.0)
            .unwrap()
            .filtfilt(&x)
            .unwrap();
        for v in y {
            assert!((v - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_short_window_falls_back() {
        let filter = EcgFilter::design(&FilterConfig::default(), 333.0).unwrap();
        let window = vec![1.0, 2.0, 3.0];

        assert!(matches!(
            filter.try_apply(&window),
            Err(SignalError::WindowTooShort { len: 3, .. })
        ));

        let out = filter.apply(&window);
        assert!(out.fell_back);
        assert_eq!(out.samples, window);
    }

    #[test]
    fn test_normalize_range() {
        let mut x = vec![1.0, 3.0, 5.0, 11.0];
        normalize(&mut x);
        let max = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!((max - 1.0).abs() < 1e-12);
        assert!(x.iter().sum::<f64>().abs() < 1e-9);
    }
}
