//! # Sales Predict
//!
//! A Rust library for retail sales forecasting with pre-trained
//! tree-ensemble models.
//!
//! ## Features
//!
//! - Tolerant sales-history handling (mixed date formats, CSV loading)
//! - Temporal, lag and rolling-window feature derivation
//! - Categorical normalization against the trained vocabulary
//!   (exact-then-fuzzy matching with a tunable cutoff)
//! - Feature-vector assembly aligned to the trained feature list
//! - Inference with ensemble-spread confidence intervals and a
//!   fixed-band fallback
//! - A volatility-based accuracy proxy for diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_predict::history::{HistoryRecord, ProductDescriptor};
//! use sales_predict::model::{ForestModel, ModelArtifact, RegressionTree};
//! use sales_predict::predictor::SalesPredictor;
//!
//! # fn main() -> Result<(), sales_predict::error::PredictError> {
//! // Load the trained artifact; a two-stump forest stands in here
//! let feature_list: Vec<String> = ["year", "month", "day", "weekday", "is_weekend"]
//!     .iter()
//!     .map(|name| name.to_string())
//!     .collect();
//! let trees = vec![
//!     RegressionTree::new(vec![-1], vec![0.0], vec![-1], vec![-1], vec![4.7])?,
//!     RegressionTree::new(vec![-1], vec![0.0], vec![-1], vec![-1], vec![4.8])?,
//! ];
//! let artifact = ModelArtifact::new("v1.0".to_string(), feature_list, ForestModel::new(trees)?)?;
//!
//! // Build the predictor once, share it across requests
//! let predictor = SalesPredictor::new(artifact);
//!
//! let history = vec![
//!     HistoryRecord { date: "2024-01-01".to_string(), sales: 100.0 },
//!     HistoryRecord { date: "2024-01-02".to_string(), sales: 110.0 },
//! ];
//! let product = ProductDescriptor {
//!     category: "Electronics".to_string(),
//!     subcategory: "Phones".to_string(),
//!     city: "Dhaka".to_string(),
//!     region: "Central".to_string(),
//! };
//!
//! let result = predictor.predict(&history, &product, "2024-01-03")?;
//! assert!(result.lower_bound <= result.prediction);
//! assert!(result.prediction <= result.upper_bound);
//! # Ok(())
//! # }
//! ```

pub mod accuracy;
pub mod assemble;
pub mod catalog;
pub mod error;
pub mod history;
pub mod lags;
pub mod model;
pub mod normalize;
pub mod predictor;
pub mod temporal;
pub mod uncertainty;

// Re-export commonly used types
pub use crate::error::PredictError;
pub use crate::history::{HistoryLoader, HistoryRecord, ProductDescriptor};
pub use crate::model::ModelArtifact;
pub use crate::predictor::{PredictionResult, PredictorConfig, SalesPredictor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
