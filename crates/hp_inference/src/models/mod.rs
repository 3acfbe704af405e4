use std::fs;
use std::path::Path;
use std::sync::Arc;
use anyhow::Context;
use hp_core::{Error, Regressor, Result};
use tracing::info;
use crate::artifact::ModelArtifact;

pub mod linear;
pub mod tree;

pub use linear::LinearRegressor;
pub use tree::{Tree, TreeEnsembleRegressor};

/// Read, parse and validate the artifact at `path`. Called once at startup;
/// any error here means the service cannot run.
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Regressor>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read model artifact {}", path.display()))?;
    let model = ModelArtifact::from_json(&json)
        .and_then(ModelArtifact::into_regressor)
        .map_err(|e| match e {
            Error::Artifact(msg) => Error::Artifact(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

    info!(
        "Loaded {} model from {} ({} features)",
        model.name(),
        path.display(),
        model.n_features()
    );
    Ok(model)
}

pub(crate) fn check_input(model: &dyn Regressor, features: &[f64]) -> Result<()> {
    if features.len() != model.n_features() {
        return Err(Error::FeatureCount {
            expected: model.n_features(),
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|x| !x.is_finite()) {
        let feature = model
            .feature_names()
            .map(|names| names[index].clone())
            .unwrap_or_else(|| index.to_string());
        return Err(Error::NonNumeric { feature });
    }
    Ok(())
}

pub(crate) fn check_output(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Inference(format!("model produced a non-finite prediction ({})", value)))
    }
}
