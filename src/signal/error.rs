use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("window of {len} samples is too short, filter needs at least {required}")]
    WindowTooShort { len: usize, required: usize },

    #[error("invalid filter design: {0}")]
    InvalidDesign(String),

    #[error("signal contains non-finite values")]
    NonFinite,
}
