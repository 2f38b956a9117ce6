use tracing::debug;

use crate::buffers::SignalBuffer;
use crate::core::WindowPolicy;

/// Result of pushing one batch of raw samples.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    /// Not enough samples to analyse yet
    Accumulating { have: usize, need: usize },
    /// A window is ready for filtering and peak detection
    Ready(Vec<f64>),
    /// Fixed windowing discarded its samples to start a new cycle
    Restarted,
}

#[derive(Debug, Clone)]
enum Inner {
    Sliding {
        buffer: SignalBuffer,
        min_samples: usize,
    },
    Fixed {
        samples: Vec<f64>,
        compute_after: usize,
        reset_after: usize,
        analysed: bool,
    },
}

/// Applies the configured windowing policy to the raw sample stream.
#[derive(Debug, Clone)]
pub struct SignalWindow {
    inner: Inner,
}

impl SignalWindow {
    pub fn new(policy: WindowPolicy) -> Self {
        let inner = match policy {
            WindowPolicy::Sliding {
                capacity,
                min_samples,
            } => Inner::Sliding {
                buffer: SignalBuffer::new(capacity),
                min_samples,
            },
            WindowPolicy::Fixed {
                compute_after,
                reset_after,
            } => Inner::Fixed {
                samples: Vec::with_capacity(reset_after),
                compute_after,
                reset_after,
                analysed: false,
            },
        };
        Self { inner }
    }

    pub fn push(&mut self, batch: &[f64]) -> WindowOutcome {
        match &mut self.inner {
            Inner::Sliding {
                buffer,
                min_samples,
            } => {
                buffer.append(batch);
                if buffer.len() < *min_samples {
                    WindowOutcome::Accumulating {
                        have: buffer.len(),
                        need: *min_samples,
                    }
                } else {
                    WindowOutcome::Ready(buffer.to_vec())
                }
            }
            Inner::Fixed {
                samples,
                compute_after,
                reset_after,
                analysed,
            } => {
                samples.extend_from_slice(batch);

                if !*analysed && samples.len() >= *compute_after {
                    *analysed = true;
                    let window = samples[..*compute_after].to_vec();
                    if samples.len() >= *reset_after {
                        debug!(len = samples.len(), "batch crossed both window thresholds");
                        samples.clear();
                        *analysed = false;
                    }
                    return WindowOutcome::Ready(window);
                }

                if *analysed && samples.len() >= *reset_after {
                    samples.clear();
                    *analysed = false;
                    return WindowOutcome::Restarted;
                }

                WindowOutcome::Accumulating {
                    have: samples.len(),
                    need: if *analysed { *reset_after } else { *compute_after },
                }
            }
        }
    }

    /// Samples currently held.
    pub fn len(&self) -> usize {
        match &self.inner {
            Inner::Sliding { buffer, .. } => buffer.len(),
            Inner::Fixed { samples, .. } => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Share of `need` held, as a percentage capped at 100.
pub fn progress(have: usize, need: usize) -> u8 {
    if need == 0 {
        return 100;
    }
    ((have.saturating_mul(100) / need).min(100)) as u8
}
