pub mod models;
pub mod error;
pub mod logging;
pub mod types;

pub use error::Error;
pub use models::Regressor;
pub use types::{ErrorResponse, HealthResponse, PredictionResponse};
pub type Result<T> = std::result::Result<T, Error>;
