//! # Predict Math
//!
//! Mathematical calculations for sales prediction pipelines.
//! This crate provides implementations of elementary statistics and
//! string-similarity measures used when aligning noisy client input with
//! a trained model's vocabulary.

use thiserror::Error;

// Calculation modules
pub mod statistics;
pub mod text;

/// Errors that can occur in prediction-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for prediction math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
