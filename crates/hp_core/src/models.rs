use std::fmt;
use crate::Result;

/// A frozen regression model that maps one feature vector to one price.
pub trait Regressor: Send + Sync + fmt::Debug {
    /// Short identifier of the model family
    fn name(&self) -> &str;

    /// Number of values `predict` expects
    fn n_features(&self) -> usize;

    /// Ordered feature names the model was trained on, if the artifact carries them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Predict a single value for one row of features
    fn predict(&self, features: &[f64]) -> Result<f64>;
}
