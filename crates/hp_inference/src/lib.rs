//! Model loading and inference for the price prediction service.

pub mod artifact;
pub mod features;
pub mod models;

pub use artifact::ModelArtifact;
pub use features::FeatureMap;
pub use models::load_model;

pub mod prelude {
    pub use super::artifact::ModelArtifact;
    pub use super::features::FeatureMap;
    pub use super::models::{load_model, LinearRegressor, TreeEnsembleRegressor};
    pub use hp_core::{Error, Regressor, Result};
}
