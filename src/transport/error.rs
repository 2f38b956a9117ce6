use thiserror::Error;

/// Why an inbound batch was refused before reaching the pipeline.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("malformed batch: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("non-finite ECG sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("non-finite temperature reading")]
    NonFiniteTemperature,
}
