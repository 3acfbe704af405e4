//! On-disk model artifact.
//!
//! An artifact is a JSON document tagged by `"type"`:
//!
//! ```json
//! { "type": "linear", "feature_names": ["rooms", "area"],
//!   "coefficients": [20000.0, 1000.0], "intercept": 50000.0 }
//! ```
//!
//! ```json
//! { "type": "tree_ensemble", "n_features": 2, "base_score": 0.0,
//!   "trees": [{ "nodes": [
//!     { "feature": 1, "threshold": 80.0, "left": 1, "right": 2 },
//!     { "value": 180000.0 },
//!     { "value": 260000.0 } ] }] }
//! ```

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use hp_core::{Error, Regressor, Result};
use crate::models::{LinearRegressor, Tree, TreeEnsembleRegressor};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearArtifact),
    TreeEnsemble(TreeEnsembleArtifact),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub n_features: usize,
    pub trees: Vec<TreeArtifact>,
    #[serde(default)]
    pub base_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<NodeArtifact>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeArtifact {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Artifact(e.to_string()))
    }

    /// Validate the artifact and build the regressor it describes.
    pub fn into_regressor(self) -> Result<Arc<dyn Regressor>> {
        match self {
            ModelArtifact::Linear(linear) => Ok(Arc::new(LinearRegressor::new(
                linear.coefficients,
                linear.intercept,
                linear.feature_names,
            )?)),
            ModelArtifact::TreeEnsemble(ensemble) => {
                let trees = ensemble
                    .trees
                    .into_iter()
                    .map(|tree| Tree::new(tree.nodes, ensemble.n_features))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Arc::new(TreeEnsembleRegressor::new(
                    trees,
                    ensemble.n_features,
                    ensemble.base_score,
                    ensemble.feature_names,
                )?))
            }
        }
    }
}

/// Shared check for an artifact's optional feature schema.
pub(crate) fn validate_feature_names(names: &Option<Vec<String>>, n_features: usize) -> Result<()> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != n_features {
        return Err(Error::Artifact(format!(
            "feature_names lists {} features but the model takes {}",
            names.len(),
            n_features
        )));
    }
    for (i, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(Error::Artifact(format!("feature name {} is empty", i)));
        }
        if names[..i].contains(name) {
            return Err(Error::Artifact(format!("duplicate feature name '{}'", name)));
        }
    }
    Ok(())
}
