/// Strictly increasing sample indices of detected heartbeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakSet(Vec<usize>);

impl PeakSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sorts and drops duplicates so the set is strictly increasing.
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PeakSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Finds heartbeat peaks in a conditioned ECG window.
pub trait PeakDetector: Send + Sync {
    /// Registry id of this detector
    fn id(&self) -> &str;

    fn find_peaks(&self, signal: &[f64], sample_rate: f64) -> PeakSet;
}

/// Local maxima above the window mean, thinned to one per refractory period
/// (tallest peaks win).
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdDetector {
    refractory_s: f64,
}

impl AdaptiveThresholdDetector {
    pub fn new(refractory_s: f64) -> Self {
        Self { refractory_s }
    }

    pub fn refractory_s(&self) -> f64 {
        self.refractory_s
    }
}

impl Default for AdaptiveThresholdDetector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl PeakDetector for AdaptiveThresholdDetector {
    fn id(&self) -> &str {
        "adaptive"
    }

    fn find_peaks(&self, signal: &[f64], sample_rate: f64) -> PeakSet {
        if signal.len() < 3 || signal.iter().any(|v| !v.is_finite()) {
            return PeakSet::empty();
        }

        let threshold = signal.iter().sum::<f64>() / signal.len() as f64;
        let candidates: Vec<usize> = local_maxima(signal)
            .into_iter()
            .filter(|&i| signal[i] >= threshold)
            .collect();

        let distance = ((self.refractory_s * sample_rate) as usize).max(1);
        PeakSet::from_indices(select_by_distance(&candidates, signal, distance))
    }
}

/// Indices of samples strictly higher than both neighbours. A flat top counts
/// once, at its middle.
pub(crate) fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Keeps the tallest peaks and drops any neighbour closer than `distance`.
/// `peaks` must be sorted.
pub(crate) fn select_by_distance(peaks: &[usize], x: &[f64], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &i in order.iter().rev() {
        if !keep[i] {
            continue;
        }

        let mut j = i;
        while j > 0 && peaks[i] - peaks[j - 1] < distance {
            keep[j - 1] = false;
            j -= 1;
        }

        let mut j = i + 1;
        while j < peaks.len() && peaks[j] - peaks[i] < distance {
            keep[j] = false;
            j += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}
