use std::sync::Arc;

use crate::domain::ports::LogBackend;
use crate::infrastructure::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub log_backend: Arc<dyn LogBackend>,
}

impl AppState {
    pub fn new(config: Config, log_backend: Arc<dyn LogBackend>) -> Self {
        Self {
            config: Arc::new(config),
            log_backend,
        }
    }
}
