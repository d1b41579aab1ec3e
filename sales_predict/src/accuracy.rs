//! Volatility-based accuracy proxy
//!
//! A heuristic diagnostic derived from the dispersion of recent history,
//! reported in SMAPE-like percentage terms. It is not a measured,
//! backtested accuracy and every result says so through its source tag
//! and the notes the pipeline attaches. Computation failures substitute
//! a fixed default instead of propagating.

use predict_math::statistics::{coefficient_of_variation, round_dp};
use serde::Serialize;

/// Value reported when the proxy cannot be computed
pub const DEFAULT_PROXY_VALUE: f64 = 10.0;

/// Metric name the proxy is reported under
pub const PROXY_METRIC: &str = "SMAPE";

/// How many trailing known sales feed the volatility window
pub const PROXY_WINDOW: usize = 7;

/// Which branch produced the proxy value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxySource {
    /// Derived from the coefficient of variation of recent sales
    Volatility,
    /// Fixed default: fewer than 2 known values or a non-positive mean
    Default,
}

/// The accuracy proxy as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyProxy {
    pub metric: &'static str,
    pub value: f64,
    pub source: ProxySource,
}

impl AccuracyProxy {
    fn default_value() -> Self {
        Self {
            metric: PROXY_METRIC,
            value: DEFAULT_PROXY_VALUE,
            source: ProxySource::Default,
        }
    }
}

/// Derive the proxy from the known sales series, using at most the last
/// [`PROXY_WINDOW`] values.
///
/// Volatility maps to a confidence score floored at 0.7, which bounds
/// the computed value to [1.0, 30.0].
pub fn accuracy_proxy(known_sales: &[f64]) -> AccuracyProxy {
    let tail = &known_sales[known_sales.len().saturating_sub(PROXY_WINDOW)..];

    match coefficient_of_variation(tail) {
        Ok(volatility) => {
            let confidence = (1.0 - volatility / 5.0).max(0.7);
            let value = round_dp(((1.0 - confidence) * 100.0).max(1.0), 2);
            AccuracyProxy {
                metric: PROXY_METRIC,
                value,
                source: ProxySource::Volatility,
            }
        }
        Err(_) => AccuracyProxy::default_value(),
    }
}
