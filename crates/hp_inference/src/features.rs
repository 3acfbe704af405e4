use std::fmt;
use serde_json::{Map, Value};
use hp_core::{Error, Regressor, Result};

/// A prediction request body: feature name to numeric value, in the order
/// the keys were received.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMap(Map<String, Value>);

impl FeatureMap {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::InvalidInput("request body is empty".to_string()));
        }
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidInput(format!(
                "expected a JSON object mapping feature names to numbers, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build the single-row vector the model consumes.
    ///
    /// With a feature schema the request is aligned by name: every schema
    /// feature must be present and no other keys are accepted. Without one,
    /// values are taken in request order and only the count is checked.
    pub fn to_vector(&self, model: &dyn Regressor) -> Result<Vec<f64>> {
        match model.feature_names() {
            Some(names) => self.by_schema(names),
            None => self.in_request_order(model.n_features()),
        }
    }

    fn by_schema(&self, names: &[String]) -> Result<Vec<f64>> {
        if let Some(unknown) = self.0.keys().find(|key| !names.contains(*key)) {
            return Err(Error::UnknownFeature(unknown.clone()));
        }
        names
            .iter()
            .map(|name| match self.0.get(name) {
                Some(value) => numeric(name, value),
                None => Err(Error::MissingFeature(name.clone())),
            })
            .collect()
    }

    fn in_request_order(&self, expected: usize) -> Result<Vec<f64>> {
        if self.0.len() != expected {
            return Err(Error::FeatureCount {
                expected,
                actual: self.0.len(),
            });
        }
        self.0.iter().map(|(name, value)| numeric(name, value)).collect()
    }
}

impl fmt::Display for FeatureMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

fn numeric(name: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .filter(|x| x.is_finite())
        .ok_or_else(|| Error::NonNumeric {
            feature: name.to_string(),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
