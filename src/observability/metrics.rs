use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for one pipeline stage. Shared behind `Arc` with the collector.
pub struct StageMetrics {
    stage: String,
    batches_processed: AtomicU64,
    degraded_count: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
}

impl StageMetrics {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            batches_processed: AtomicU64::new(0),
            degraded_count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn batches_processed(&self) -> u64 {
        self.batches_processed.load(Ordering::Relaxed)
    }

    /// Batches where the stage produced placeholder output (insufficient data,
    /// disconnected sensor, filter fallback, coerced metrics)
    pub fn degraded_count(&self) -> u64 {
        self.degraded_count.load(Ordering::Relaxed)
    }

    pub fn record_batch(&self) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded(&self) {
        self.degraded_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_processing(&self) -> Instant {
        Instant::now()
    }

    /// Records latency since `start` and counts the batch.
    pub fn finish_processing(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
        self.record_batch();
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }
}
