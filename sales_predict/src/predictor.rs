//! The request-to-prediction pipeline
//!
//! A [`SalesPredictor`] owns the trained artifact and the token catalog
//! derived from it, both built once and never mutated, so a single
//! instance can serve any number of requests with no shared mutable
//! state. Each call runs the full chain: validate input, order the
//! series with the target row appended, derive temporal and lag/rolling
//! features, normalize the categorical attributes, assemble the aligned
//! vector, run inference with an uncertainty band, and attach the
//! volatility proxy and diagnostics.

use crate::accuracy::{accuracy_proxy, AccuracyProxy};
use crate::assemble::{assemble_features, ResolvedToken};
use crate::catalog::TokenCatalog;
use crate::error::{PredictError, Result};
use crate::history::{
    parse_client_date, sort_rows_by_date, to_series_rows, HistoryRecord, ProductDescriptor,
    SeriesRow,
};
use crate::lags::lag_features_grouped;
use crate::model::ModelArtifact;
use crate::normalize::{normalize_token, TokenMatch, DEFAULT_FUZZY_CUTOFF};
use crate::temporal::calendar_features;
use crate::uncertainty::{estimate, IntervalMethod, CONFIDENCE_Z, FALLBACK_BAND_PCT};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tunable knobs of the pipeline. The defaults match the values the
/// model was calibrated against; most deployments never change them.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Similarity cutoff for fuzzy categorical matching, in [0, 1].
    /// Scores are normalized Levenshtein ratios; values at or above the
    /// cutoff are accepted. Default 0.55.
    pub fuzzy_cutoff: f64,
    /// z multiplier for the ensemble-spread interval. Default 1.96 (95%).
    pub confidence_z: f64,
    /// Half-width of the band used when no ensemble is available.
    /// Default 0.15.
    pub fallback_band_pct: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            confidence_z: CONFIDENCE_Z,
            fallback_band_pct: FALLBACK_BAND_PCT,
        }
    }
}

/// Per-request observability payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Number of features in the assembled vector (always the trained
    /// feature count)
    pub features_total: usize,
    /// Categorical attributes resolved to a catalog token
    pub matched_tokens: BTreeMap<String, ResolvedToken>,
    /// Categorical attributes normalization could not map
    pub unmatched_tokens: Vec<String>,
    /// Which interval branch ran, with its parameters
    pub interval: IntervalMethod,
    /// History records received
    pub history_rows: usize,
    /// History records whose date failed to parse
    pub dropped_dates: usize,
}

/// The answer to one prediction request. Constructed per request,
/// returned, and discarded; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub model_version: String,
    /// Central sales estimate, rounded to 2 decimals
    pub prediction: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// The date the estimate is for, echoed back for display
    pub prediction_date: NaiveDate,
    pub historical_accuracy: AccuracyProxy,
    pub notes: &'static str,
    pub diagnostics: Diagnostics,
}

/// A loaded model plus everything derived from it, ready to serve
/// requests concurrently by shared reference.
#[derive(Debug)]
pub struct SalesPredictor {
    artifact: ModelArtifact,
    catalog: TokenCatalog,
    config: PredictorConfig,
}

impl SalesPredictor {
    /// Create a predictor with default configuration
    pub fn new(artifact: ModelArtifact) -> Self {
        Self::with_config(artifact, PredictorConfig::default())
    }

    /// Create a predictor with explicit configuration. The token catalog
    /// is derived from the artifact's feature list here, once.
    pub fn with_config(artifact: ModelArtifact, config: PredictorConfig) -> Self {
        let catalog = TokenCatalog::from_feature_list(&artifact.feature_list);
        debug!(
            "catalog built from feature list: {} tokens across attributes",
            catalog.len()
        );
        Self {
            artifact,
            catalog,
            config,
        }
    }

    /// The trained artifact backing this predictor
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// The vocabulary recovered from the trained feature list
    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    /// Predict sales for `target_date` given a product and its history.
    ///
    /// The target date is parsed with the same tolerant formats as
    /// history dates, but unlike them it must parse: a garbage target
    /// date is an input error, not a missing value.
    pub fn predict(
        &self,
        history: &[HistoryRecord],
        product: &ProductDescriptor,
        target_date: &str,
    ) -> Result<PredictionResult> {
        let target = parse_client_date(target_date).ok_or_else(|| {
            PredictError::InvalidInput(format!("Unparseable target date: {:?}", target_date))
        })?;

        self.predict_for_date(history, product, target)
    }

    /// Predict sales for an already-parsed target date
    pub fn predict_for_date(
        &self,
        history: &[HistoryRecord],
        product: &ProductDescriptor,
        target: NaiveDate,
    ) -> Result<PredictionResult> {
        if history.is_empty() {
            return Err(PredictError::InvalidInput(
                "History must contain at least one record".to_string(),
            ));
        }

        let (mut rows, dropped_dates) = to_series_rows(history);
        if rows.iter().all(|row| row.date.is_none()) {
            return Err(PredictError::InvalidInput(
                "History contains no parseable dates".to_string(),
            ));
        }

        // The target row joins the series before any feature derivation
        // so its lags and rolling means see the same continuous history
        // as every other row.
        rows.push(SeriesRow {
            date: Some(target),
            sales: None,
        });
        sort_rows_by_date(&mut rows);

        let target_index = rows
            .iter()
            .position(|row| row.sales.is_none())
            .ok_or_else(|| {
                PredictError::Internal("Target row lost during series ordering".to_string())
            })?;

        let sales: Vec<Option<f64>> = rows.iter().map(|row| row.sales).collect();
        let group_key = product.group_key();
        let group_keys: Vec<&str> = vec![group_key.as_str(); rows.len()];
        let lag_rows = lag_features_grouped(&group_keys, &sales)?;
        let lags = lag_rows[target_index];

        let calendar = calendar_features(target);

        let resolved: Vec<(&'static str, &str, TokenMatch)> = product
            .attributes()
            .into_iter()
            .map(|(attribute, raw)| {
                let matched =
                    normalize_token(raw, &self.catalog, attribute, self.config.fuzzy_cutoff);
                (attribute, raw, matched)
            })
            .collect();

        let (vector, report) = assemble_features(
            &self.artifact.feature_list,
            &calendar,
            &lags,
            &resolved,
        );

        let interval = estimate(
            &self.artifact.model,
            vector.values(),
            self.config.confidence_z,
            self.config.fallback_band_pct,
        );

        // Known sales in series order; the target row contributes none.
        let known_sales: Vec<f64> = rows.iter().filter_map(|row| row.sales).collect();
        let historical_accuracy = accuracy_proxy(&known_sales);

        Ok(PredictionResult {
            model_version: self.artifact.model_version.clone(),
            prediction: interval.prediction,
            lower_bound: interval.lower_bound,
            upper_bound: interval.upper_bound,
            prediction_date: target,
            historical_accuracy,
            notes: "Accuracy is a volatility-derived heuristic, not a backtested error rate.",
            diagnostics: Diagnostics {
                features_total: vector.len(),
                matched_tokens: report.matched,
                unmatched_tokens: report.unmatched,
                interval: interval.method,
                history_rows: history.len(),
                dropped_dates,
            },
        })
    }
}
