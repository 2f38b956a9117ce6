use super::MetricsCollector;

pub struct PipelineMonitor {
    collector: MetricsCollector,
}

impl PipelineMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No stages registered".to_string();
        }

        let mut report = String::from("=== Pipeline Metrics ===\n");

        for (stage, metrics) in snapshot.iter() {
            report.push_str(&format!(
                "\n[{}]\n  Batches: {} processed\n  Degraded: {}\n  Avg Latency: {}μs\n",
                stage,
                metrics.batches_processed,
                match metrics.degraded_count {
                    0 => "none".to_string(),
                    1 => "1 batch".to_string(),
                    n => format!("{} batches", n),
                },
                metrics.avg_latency_us
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
