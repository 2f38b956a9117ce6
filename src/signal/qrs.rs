//! Gradient-energy QRS detector.
//!
//! Marks QRS regions where the smoothed absolute slope of the signal rises well
//! above its slower running average, then takes the tallest local maximum of
//! each region as the R-peak.

use super::peaks::{local_maxima, PeakDetector, PeakSet};

#[derive(Debug, Clone)]
pub struct GradientQrsDetector {
    /// Boxcar width applied to the absolute gradient
    pub smooth_window_s: f64,
    /// Boxcar width of the running average the smoothed gradient is compared to
    pub avg_window_s: f64,
    pub grad_thresh_weight: f64,
    /// Regions shorter than this fraction of the mean region length are noise
    pub min_len_weight: f64,
    pub min_delay_s: f64,
}

impl Default for GradientQrsDetector {
    fn default() -> Self {
        Self {
            smooth_window_s: 0.1,
            avg_window_s: 0.75,
            grad_thresh_weight: 1.5,
            min_len_weight: 0.4,
            min_delay_s: 0.3,
        }
    }
}

impl GradientQrsDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn qrs_regions(&self, signal: &[f64], sample_rate: f64) -> Vec<(usize, usize)> {
        let abs_grad: Vec<f64> = gradient(signal).into_iter().map(f64::abs).collect();

        let smooth_size = ((self.smooth_window_s * sample_rate).round() as usize).max(1);
        let avg_size = ((self.avg_window_s * sample_rate).round() as usize).max(1);
        let smooth = boxcar(&abs_grad, smooth_size);
        let avg = boxcar(&smooth, avg_size);

        let in_qrs: Vec<bool> = smooth
            .iter()
            .zip(&avg)
            .map(|(s, a)| *s > self.grad_thresh_weight * a)
            .collect();

        let begins: Vec<usize> = (0..in_qrs.len() - 1)
            .filter(|&i| !in_qrs[i] && in_qrs[i + 1])
            .collect();
        let Some(&first_begin) = begins.first() else {
            return Vec::new();
        };
        let ends: Vec<usize> = (0..in_qrs.len() - 1)
            .filter(|&i| in_qrs[i] && !in_qrs[i + 1] && i > first_begin)
            .collect();

        begins.into_iter().zip(ends).collect()
    }
}

impl PeakDetector for GradientQrsDetector {
    fn id(&self) -> &str {
        "gradient_qrs"
    }

    fn find_peaks(&self, signal: &[f64], sample_rate: f64) -> PeakSet {
        if signal.len() < 3 || signal.iter().any(|v| !v.is_finite()) {
            return PeakSet::empty();
        }

        let regions = self.qrs_regions(signal, sample_rate);
        if regions.is_empty() {
            return PeakSet::empty();
        }

        let mean_len = regions.iter().map(|(b, e)| (e - b) as f64).sum::<f64>()
            / regions.len() as f64;
        let min_len = mean_len * self.min_len_weight;
        let min_delay = (self.min_delay_s * sample_rate).round() as usize;

        let mut peaks: Vec<usize> = Vec::new();
        for (begin, end) in regions {
            if ((end - begin) as f64) < min_len {
                continue;
            }

            let segment = &signal[begin..end];
            let Some(local) = local_maxima(segment)
                .into_iter()
                .max_by(|&a, &b| segment[a].total_cmp(&segment[b]))
            else {
                continue;
            };

            let peak = begin + local;
            if peaks.last().map_or(true, |&last| peak - last > min_delay) {
                peaks.push(peak);
            }
        }

        PeakSet::from_indices(peaks)
    }
}

/// Central differences inside, one-sided at the edges.
fn gradient(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut g = Vec::with_capacity(n);
    g.push(x[1] - x[0]);
    for i in 1..n - 1 {
        g.push((x[i + 1] - x[i - 1]) / 2.0);
    }
    g.push(x[n - 1] - x[n - 2]);
    g
}

/// Centred moving average; edges are padded with the edge values.
fn boxcar(x: &[f64], size: usize) -> Vec<f64> {
    let n = x.len();
    let left = size / 2;
    let right = (size - 1) / 2;

    // prefix[k] = sum of padded[..k], padded = [x0; left] ++ x ++ [xn; right]
    let mut prefix = Vec::with_capacity(n + left + right + 1);
    prefix.push(0.0);
    let padded = std::iter::repeat(x[0])
        .take(left)
        .chain(x.iter().copied())
        .chain(std::iter::repeat(x[n - 1]).take(right));
    for v in padded {
        let acc = prefix[prefix.len() - 1] + v;
        prefix.push(acc);
    }

    (0..n)
        .map(|i| (prefix[i + size] - prefix[i]) / size as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxcar_constant() {
        let y = boxcar(&[2.0; 10], 4);
        assert!(y.iter().all(|v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_boxcar_centred() {
        let y = boxcar(&[0.0, 0.0, 3.0, 0.0, 0.0], 3);
        assert_eq!(y, vec![0.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_gradient() {
        assert_eq!(gradient(&[0.0, 1.0, 4.0]), vec![1.0, 2.0, 3.0]);
    }
}
