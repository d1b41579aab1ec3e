//! Error types for the sales_predict crate

use thiserror::Error;

/// Custom error types for the sales_predict crate
#[derive(Debug, Error)]
pub enum PredictError {
    /// The caller supplied a request the pipeline cannot work with
    /// (empty history, no parseable dates, bad target date). These are
    /// correctable on the client side and are reported distinctly from
    /// everything else.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The trained model artifact is malformed or internally inconsistent
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while decoding an artifact or payload from JSON
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Any unanticipated failure inside the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PredictError>;

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::JsonError(err.to_string())
    }
}

impl From<csv::Error> for PredictError {
    fn from(err: csv::Error) -> Self {
        PredictError::InvalidInput(format!("CSV error: {}", err))
    }
}
