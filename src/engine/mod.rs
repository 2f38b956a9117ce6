pub mod async_pipeline;
pub mod calibration;
pub mod decision;
pub mod pipeline;
pub mod state;
pub mod window;

pub use async_pipeline::AsyncPipeline;
pub use calibration::{BaselineCalibrator, BaselineProfile, CalibrationStep};
pub use decision::{DecisionEngine, Reading};
pub use pipeline::Pipeline;
pub use state::PipelineState;
pub use window::{progress, SignalWindow, WindowOutcome};
