use std::sync::Arc;

use folio_core::store::{ContentStore, GitHubStore, LocalStore, MemoryStore, StoreError};
use folio_core::ContentService;
use subtle::ConstantTimeEq;

use crate::config::{AppConfig, StoreBackend};

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: AppConfig,
    service: ContentService,
}

impl AppState {
    pub fn new(config: AppConfig, service: ContentService) -> Self {
        Self {
            inner: Arc::new(InnerState { config, service }),
        }
    }

    /// Wire the configured remote store with the local checkout, which serves
    /// the public routes and backs up admin config reads.
    pub fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let remote: Arc<dyn ContentStore> = match &config.store {
            StoreBackend::GitHub(github) => Arc::new(GitHubStore::new(github.clone())?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let local: Arc<dyn ContentStore> = Arc::new(LocalStore::new(&config.content_root));
        let service = ContentService::new(remote, Some(local), config.layout.clone());
        Ok(Self::new(config, service))
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &ContentService {
        &self.inner.service
    }

    /// Compare a presented admin credential in constant time.
    pub fn admin_password_matches(&self, presented: &str) -> bool {
        let expected = self.inner.config.admin_password.as_bytes();
        presented.as_bytes().ct_eq(expected).into()
    }
}
