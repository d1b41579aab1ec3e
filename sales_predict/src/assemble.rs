//! Feature vector assembly against the trained feature list
//!
//! Training-time one-hot encoding is unstable under re-encoding fresh
//! data (new categories enumerate differently), so alignment is driven
//! exclusively by the immutable trained feature list: every entry starts
//! at zero, known sources are copied in by name, and anything computed
//! here that training never saw is discarded. The vector's length and
//! column order therefore always match what the model expects.

use crate::lags::LagFeatures;
use crate::normalize::TokenMatch;
use crate::temporal::CalendarFeatures;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// How a categorical attribute was resolved to its dummy column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
}

/// A categorical attribute that made it into the vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedToken {
    pub token: String,
    pub method: MatchMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Bookkeeping produced alongside the vector for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssemblyReport {
    /// Attributes resolved to a catalog token, keyed by attribute name
    pub matched: BTreeMap<String, ResolvedToken>,
    /// Attributes normalization could not map; their dummy encoding is
    /// all zeros unless the raw value happened to name a trained column
    pub unmatched: Vec<String>,
}

/// A numeric vector whose positions match the trained feature list.
///
/// Only the assembler constructs these, which is what keeps the
/// length-and-order invariant airtight.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// The assembled values, in trained feature order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of features (always the trained feature count)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Merge temporal, lag/rolling and categorical signals into a single
/// vector aligned to `feature_list`.
///
/// Absent columns stay 0.0. For each attribute the resolved token sets
/// the `<Attribute>_<token>` entry to 1.0 when training produced such a
/// column; a token dropped as the encoding reference during training
/// correctly yields all zeros. When normalization found nothing, the raw
/// trimmed value is probed as a last-resort column name before the
/// attribute is reported unmatched.
pub fn assemble_features(
    feature_list: &[String],
    calendar: &CalendarFeatures,
    lags: &LagFeatures,
    categorical: &[(&'static str, &str, TokenMatch)],
) -> (FeatureVector, AssemblyReport) {
    let index: HashMap<&str, usize> = feature_list
        .iter()
        .enumerate()
        .map(|(position, name)| (name.as_str(), position))
        .collect();

    let mut values = vec![0.0; feature_list.len()];

    for (name, value) in calendar.named().into_iter().chain(lags.named()) {
        if let Some(&position) = index.get(name) {
            values[position] = value;
        }
    }

    let mut report = AssemblyReport::default();
    for (attribute, raw, resolved) in categorical {
        let token = match resolved {
            TokenMatch::Exact(token) => {
                report.matched.insert(
                    attribute.to_string(),
                    ResolvedToken {
                        token: token.clone(),
                        method: MatchMethod::Exact,
                        score: None,
                    },
                );
                token.clone()
            }
            TokenMatch::Fuzzy { token, score } => {
                report.matched.insert(
                    attribute.to_string(),
                    ResolvedToken {
                        token: token.clone(),
                        method: MatchMethod::Fuzzy,
                        score: Some(*score),
                    },
                );
                token.clone()
            }
            TokenMatch::NoMatch => {
                report.unmatched.push(attribute.to_string());
                raw.trim().to_string()
            }
        };

        let column = format!("{}_{}", attribute, token);
        if let Some(&position) = index.get(column.as_str()) {
            values[position] = 1.0;
        }
    }

    (FeatureVector { values }, report)
}
