use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Artifact(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Feature '{feature}' is not a finite number")]
    NonNumeric { feature: String },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True when the caller sent something the model cannot consume.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Serialization(_)
                | Error::InvalidInput(_)
                | Error::FeatureCount { .. }
                | Error::MissingFeature(_)
                | Error::UnknownFeature(_)
                | Error::NonNumeric { .. }
        )
    }

    /// Display string of the error followed by every source in its chain.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let cause_str = cause.to_string();
            // `#[from]` variants repeat their source in their own message
            if !out.ends_with(&cause_str) {
                out.push_str(": ");
                out.push_str(&cause_str);
            }
            source = cause.source();
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, Error>;
