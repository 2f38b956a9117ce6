use std::collections::VecDeque;

/// Bounded FIFO of raw ECG samples. Always holds the most recent `capacity`
/// samples in arrival order.
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SignalBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append to the tail, evicting the oldest overflow.
    pub fn append(&mut self, batch: &[f64]) {
        if batch.len() >= self.capacity {
            self.samples.clear();
            self.samples
                .extend(batch[batch.len() - self.capacity..].iter().copied());
            return;
        }

        let overflow = (self.samples.len() + batch.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(batch.iter().copied());
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
