//! Application state management

use std::sync::Arc;

use crate::browser::{BrowserEngine, ChromiumProvider};
use crate::config::Config;
use crate::render::PdfExporter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    exporter: PdfExporter,
}

impl AppState {
    /// Create the application state around a browser engine
    pub fn new(config: Config, engine: Arc<dyn BrowserEngine>) -> Self {
        let provider = ChromiumProvider::new(config.chromium.executable_override.clone());
        let exporter = PdfExporter::new(engine, provider, config.chromium.environment);

        Self {
            inner: Arc::new(AppStateInner { config, exporter }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the PDF exporter
    pub fn exporter(&self) -> &PdfExporter {
        &self.inner.exporter
    }
}
