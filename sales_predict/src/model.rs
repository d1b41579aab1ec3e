//! Trained model artifact: tree-ensemble regressor plus feature schema
//!
//! The artifact arrives pre-fitted; nothing here trains anything. A
//! model predicts in log1p-transformed target space and is queried
//! through the [`Regressor`] trait so the rest of the pipeline never
//! depends on the concrete model family. Ensembles additionally expose
//! their member predictors, whose disagreement drives the uncertainty
//! band.

use crate::error::{PredictError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::Path;

/// A fitted regressor operating on an aligned feature vector.
///
/// `predict` returns a log-scale estimate; inversion to sales scale is
/// the caller's concern.
pub trait Regressor: Debug {
    /// Log-scale prediction for a feature vector in trained column order
    fn predict(&self, features: &[f64]) -> f64;

    /// Member predictors when the model aggregates several, else `None`
    fn members(&self) -> Option<Vec<&dyn Regressor>> {
        None
    }

    /// Name of the model family
    fn name(&self) -> &str;
}

/// A single regression tree in array encoding.
///
/// Node `i` splits on `feature[i]` at `threshold[i]`; values at or below
/// the threshold descend to `left[i]`, the rest to `right[i]`. A
/// negative child marks `i` as a leaf emitting `value[i]`. Children must
/// point forward (child index greater than the node's own), which rules
/// out cycles by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    left: Vec<i32>,
    right: Vec<i32>,
    value: Vec<f64>,
}

impl RegressionTree {
    /// Create a tree from node arrays, checking internal consistency.
    ///
    /// Feature indices are validated later, against the artifact's
    /// feature list.
    pub fn new(
        feature: Vec<i32>,
        threshold: Vec<f64>,
        left: Vec<i32>,
        right: Vec<i32>,
        value: Vec<f64>,
    ) -> Result<Self> {
        let tree = Self {
            feature,
            threshold,
            left,
            right,
            value,
        };
        tree.check_shape()?;
        Ok(tree)
    }

    /// Validate array lengths and child pointers
    fn check_shape(&self) -> Result<()> {
        let nodes = self.feature.len();
        if nodes == 0 {
            return Err(PredictError::Artifact(
                "Tree definition contains no nodes".to_string(),
            ));
        }
        if self.threshold.len() != nodes
            || self.left.len() != nodes
            || self.right.len() != nodes
            || self.value.len() != nodes
        {
            return Err(PredictError::Artifact(
                "Tree definition invalid: node array length mismatch".to_string(),
            ));
        }

        for node in 0..nodes {
            let left = self.left[node];
            let right = self.right[node];
            if (left < 0) != (right < 0) {
                return Err(PredictError::Artifact(format!(
                    "Tree node {} has exactly one child; leaves must have none",
                    node
                )));
            }
            if left >= 0 {
                for child in [left, right] {
                    let child = child as usize;
                    if child <= node || child >= nodes {
                        return Err(PredictError::Artifact(format!(
                            "Tree node {} has out-of-order child {}",
                            node, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate split feature indices against the trained feature count
    fn check_features(&self, feature_count: usize) -> Result<()> {
        for node in 0..self.feature.len() {
            if self.left[node] < 0 {
                continue;
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= feature_count {
                return Err(PredictError::Artifact(format!(
                    "Tree node {} splits on feature {} but the feature list has {} entries",
                    node, feature, feature_count
                )));
            }
        }
        Ok(())
    }

    fn predict_value(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            if self.left[node] < 0 {
                return self.value[node];
            }
            let feature_value = features
                .get(self.feature[node] as usize)
                .copied()
                .unwrap_or(0.0);
            node = if feature_value <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
    }
}

impl Regressor for RegressionTree {
    fn predict(&self, features: &[f64]) -> f64 {
        self.predict_value(features)
    }

    fn name(&self) -> &str {
        "regression_tree"
    }
}

/// A forest of regression trees predicting their mean
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    trees: Vec<RegressionTree>,
}

impl ForestModel {
    /// Create a forest from already-validated trees
    pub fn new(trees: Vec<RegressionTree>) -> Result<Self> {
        if trees.is_empty() {
            return Err(PredictError::Artifact(
                "Forest contains no trees".to_string(),
            ));
        }
        Ok(Self { trees })
    }

    /// Number of member trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether the forest holds no trees (never true after validation)
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    fn validate(&self, feature_count: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PredictError::Artifact(
                "Forest contains no trees".to_string(),
            ));
        }
        for tree in &self.trees {
            tree.check_shape()?;
            tree.check_features(feature_count)?;
        }
        Ok(())
    }
}

impl Regressor for ForestModel {
    fn predict(&self, features: &[f64]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_value(features))
            .sum();
        sum / self.trees.len() as f64
    }

    fn members(&self) -> Option<Vec<&dyn Regressor>> {
        Some(self.trees.iter().map(|tree| tree as &dyn Regressor).collect())
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

fn default_model_version() -> String {
    "v1.0".to_string()
}

/// The immutable trained artifact: model, schema, version.
///
/// Loaded once at process start and shared read-only for the process
/// lifetime; no component ever mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// Canonical ordered feature schema the assembler must produce
    pub feature_list: Vec<String>,
    pub model: ForestModel,
}

impl ModelArtifact {
    /// Decode and validate an artifact from its JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(text)?;
        artifact.validate()?;
        debug!(
            "loaded model artifact {}: {} trees, {} features",
            artifact.model_version,
            artifact.model.len(),
            artifact.feature_list.len()
        );
        Ok(artifact)
    }

    /// Load and validate an artifact from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Create an artifact from parts, applying the same validation as
    /// the JSON loaders
    pub fn new(model_version: String, feature_list: Vec<String>, model: ForestModel) -> Result<Self> {
        let artifact = Self {
            model_version,
            feature_list,
            model,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Number of features the model expects
    pub fn feature_count(&self) -> usize {
        self.feature_list.len()
    }

    fn validate(&self) -> Result<()> {
        if self.feature_list.is_empty() {
            return Err(PredictError::Artifact(
                "Artifact has an empty feature list".to_string(),
            ));
        }
        self.model.validate(self.feature_list.len())
    }
}
