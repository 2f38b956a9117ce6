use serde::{Deserialize, Serialize};
use std::fmt;

/// Outbound events consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PipelineEvent {
    StatusUpdate { text: String },
    ChartUpdate(ChartUpdate),
    Decision(DecisionUpdate),
    MetricsUpdate(MetricsSnapshot),
}

impl PipelineEvent {
    pub fn status(text: impl Into<String>) -> Self {
        Self::StatusUpdate { text: text.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StatusUpdate { .. } => "status_update",
            Self::ChartUpdate(_) => "chart_update",
            Self::Decision(_) => "decision",
            Self::MetricsUpdate(_) => "metrics_update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartUpdate {
    pub ecg_data: Vec<f64>,
    pub temp1: f64,
    pub temp2: f64,
    pub bpm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Truthful,
    Deceptive,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truthful => write!(f, "Truthful"),
            Self::Deceptive => write!(f, "Deceptive"),
        }
    }
}

/// Outcome of comparing one reading against the frozen baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub verdict: Verdict,
    pub reasons: Vec<String>,
    pub hr: f64,
    pub temp_avg: f64,
    pub temp1: f64,
    pub temp2: f64,
    /// Milliseconds since epoch of the batch that produced the reading
    pub timestamp: u64,
}

impl DecisionRecord {
    /// Copy with HR and temperatures rounded to one decimal for display.
    pub fn rounded(&self) -> Self {
        Self {
            hr: round_to(self.hr, 1),
            temp_avg: round_to(self.temp_avg, 1),
            temp1: round_to(self.temp1, 1),
            temp2: round_to(self.temp2, 1),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionUpdate {
    #[serde(flatten)]
    pub record: DecisionRecord,
    pub ecg_data: Vec<f64>,
}

/// Latest analysed window, as shown on the metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub bpm: f64,
    pub sdnn: f64,
    pub rmssd: f64,
    pub pnn50: f64,
    pub temp1: f64,
    pub temp2: f64,
    pub status: String,
    /// Percentage of the current window requirement accumulated
    pub progress: u8,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            bpm: 0.0,
            sdnn: 0.0,
            rmssd: 0.0,
            pnn50: 0.0,
            temp1: 0.0,
            temp2: 0.0,
            status: "Waiting for data...".to_string(),
            progress: 0,
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
