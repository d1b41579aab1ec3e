//! Inference and uncertainty estimation
//!
//! The model predicts in log1p-transformed target space; estimates are
//! inverted to sales scale before aggregation. When the model exposes an
//! ensemble, member disagreement yields the confidence interval; when it
//! does not (or a member output is unusable) the estimator degrades to a
//! fixed percentage band around the single point estimate. Which branch
//! ran is carried explicitly in [`IntervalMethod`], never implied.

use crate::model::Regressor;
use log::debug;
use predict_math::statistics::round_dp;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

/// z-score for the 95% interval derived from ensemble spread
pub const CONFIDENCE_Z: f64 = 1.96;

/// Band half-width applied when no ensemble members are available
pub const FALLBACK_BAND_PCT: f64 = 0.15;

/// Invert the log1p target transform back to sales scale
pub fn to_sales_scale(log_estimate: f64) -> f64 {
    log_estimate.exp_m1()
}

/// How the interval around the central estimate was derived
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IntervalMethod {
    /// Median and population dispersion of the member predictions
    EnsembleSpread {
        members: usize,
        dispersion: f64,
        /// Dispersion as a percentage of the central estimate
        dispersion_pct: f64,
    },
    /// Fixed ± band around the single point estimate
    FixedBand { band_pct: f64 },
}

/// Central estimate with its uncertainty band, sales scale, 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInterval {
    pub prediction: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    #[serde(flatten)]
    pub method: IntervalMethod,
}

/// Run inference and derive the uncertainty band.
///
/// The ensemble branch needs at least two members, all with finite
/// sales-scale predictions; anything less falls back to the fixed band
/// silently. This never returns an error.
pub fn estimate(model: &dyn Regressor, features: &[f64], z: f64, band_pct: f64) -> PredictionInterval {
    if let Some(members) = model.members() {
        if members.len() >= 2 {
            let predictions: Vec<f64> = members
                .iter()
                .map(|member| to_sales_scale(member.predict(features)))
                .collect();

            if predictions.iter().all(|p| p.is_finite()) {
                return ensemble_interval(&predictions, z);
            }
            debug!("non-finite ensemble member prediction, using fixed band");
        } else {
            debug!(
                "ensemble exposes {} member(s), using fixed band",
                members.len()
            );
        }
    } else {
        debug!("model {} exposes no ensemble members, using fixed band", model.name());
    }

    fixed_band_interval(model, features, band_pct)
}

fn ensemble_interval(predictions: &[f64], z: f64) -> PredictionInterval {
    let center = Data::new(predictions.to_vec()).median();
    let dispersion = predictions.iter().population_std_dev();
    let dispersion_pct = if center > f64::EPSILON {
        dispersion / center * 100.0
    } else {
        0.0
    };

    PredictionInterval {
        prediction: round_dp(center, 2),
        lower_bound: round_dp((center - z * dispersion).max(0.0), 2),
        upper_bound: round_dp(center + z * dispersion, 2),
        method: IntervalMethod::EnsembleSpread {
            members: predictions.len(),
            dispersion,
            dispersion_pct,
        },
    }
}

fn fixed_band_interval(model: &dyn Regressor, features: &[f64], band_pct: f64) -> PredictionInterval {
    // Bounds derive from the rounded estimate so the band is exact at
    // two decimals.
    let prediction = round_dp(to_sales_scale(model.predict(features)), 2);

    PredictionInterval {
        prediction,
        lower_bound: round_dp(prediction * (1.0 - band_pct), 2),
        upper_bound: round_dp(prediction * (1.0 + band_pct), 2),
        method: IntervalMethod::FixedBand { band_pct },
    }
}
