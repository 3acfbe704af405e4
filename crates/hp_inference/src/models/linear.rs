use hp_core::{Error, Regressor, Result};
use crate::artifact::validate_feature_names;
use super::{check_input, check_output};

/// Ordinary linear regression: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
    feature_names: Option<Vec<String>>,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64, feature_names: Option<Vec<String>>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::Artifact("linear model has no coefficients".to_string()));
        }
        if let Some(i) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(Error::Artifact(format!("coefficient {} is not finite", i)));
        }
        if !intercept.is_finite() {
            return Err(Error::Artifact("intercept is not finite".to_string()));
        }
        validate_feature_names(&feature_names, coefficients.len())?;

        Ok(Self {
            coefficients,
            intercept,
            feature_names,
        })
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        check_input(self, features)?;
        let value = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (w, x)| acc + w * x);
        check_output(value)
    }
}
