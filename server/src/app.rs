use std::sync::Arc;

use qr_engine::Pipeline;

use crate::config::AppConfig;

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: AppConfig,
    /// Render pipeline with its injected collaborators
    pipeline: Pipeline,
}

impl SharedState {
    pub fn new(config: AppConfig, pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(SharedStateInner { config, pipeline }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }
}
