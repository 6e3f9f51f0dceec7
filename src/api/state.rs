use std::sync::Arc;

use crate::statistics::StatisticsEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StatisticsEngine>,
    /// `*` or a single allowed origin
    pub cors_origin: String,
}

impl AppState {
    pub fn new(engine: StatisticsEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
