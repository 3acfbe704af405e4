use std::sync::Arc;
use hp_core::Regressor;

/// Shared by every request; the model is read-only after startup.
pub struct AppState {
    pub model: Arc<dyn Regressor>,
}

impl AppState {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model }
    }
}
