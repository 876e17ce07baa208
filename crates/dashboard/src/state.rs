//! Application state shared across route handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::DashboardConfig;

/// Shared application state.
///
/// Cheap to clone; all fields live behind a single `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    backend: BackendClient,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream API client cannot be constructed.
    pub fn new(config: DashboardConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, backend }),
        })
    }

    /// The dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// The upstream API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }
}
