//! Application state shared across handlers.

use std::path::Path;
use std::sync::Arc;

use crate::commerce::{CommerceClient, CommerceError};
use crate::config::SiteConfig;
use crate::content::{ContentError, ContentStore};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("commerce client: {0}")]
    Commerce(#[from] CommerceError),
    #[error("content store: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the commerce backend client, and the loaded content.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    commerce: CommerceClient,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the commerce client cannot be constructed or the
    /// content directory cannot be read.
    pub fn new(config: SiteConfig, content_dir: &Path) -> Result<Self, StateError> {
        let commerce = CommerceClient::new(&config.commerce)?;
        let content = ContentStore::load(content_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                content,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce backend client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get a reference to the content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
