pub mod batch;
pub mod config;
pub mod event;

pub use batch::{RawBatch, Temperatures, TEMP_DISCONNECTED};
pub use config::{
    CalibrationConfig, DecisionConfig, DetectorConfig, FilterConfig, HrvConfig, IngestConfig,
    PipelineConfig, TemperatureConfig, WindowPolicy,
};
pub use event::{
    round_to, ChartUpdate, DecisionRecord, DecisionUpdate, MetricsSnapshot, PipelineEvent, Verdict,
};
