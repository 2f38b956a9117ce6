use std::collections::BTreeMap;
use std::sync::Arc;

use super::StageMetrics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSnapshot {
    pub stage: String,
    pub batches_processed: u64,
    pub degraded_count: u64,
    pub avg_latency_us: u64,
}

/// Registry of stage counters, ordered by stage name.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<String, Arc<StageMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates, registers and returns counters for `stage`.
    pub fn stage(&mut self, stage: &str) -> Arc<StageMetrics> {
        let metrics = Arc::new(StageMetrics::new(stage));
        self.register(stage, metrics.clone());
        metrics
    }

    pub fn register(&mut self, stage: impl Into<String>, metrics: Arc<StageMetrics>) {
        self.metrics.insert(stage.into(), metrics);
    }

    pub fn snapshot(&self) -> BTreeMap<String, StageSnapshot> {
        self.metrics
            .iter()
            .map(|(id, m)| {
                (
                    id.clone(),
                    StageSnapshot {
                        stage: m.stage().to_string(),
                        batches_processed: m.batches_processed(),
                        degraded_count: m.degraded_count(),
                        avg_latency_us: m.avg_latency_us(),
                    },
                )
            })
            .collect()
    }

    pub fn get_stage_metrics(&self, stage: &str) -> Option<Arc<StageMetrics>> {
        self.metrics.get(stage).cloned()
    }
}
