//! Ordered read fallback across stores.

use std::fmt;
use std::sync::Arc;

use super::{ContentStore, StoreError, StoreResult, VersionToken};

/// Stores tried in order for reads, normally the remote store followed by
/// the local checkout.
///
/// A provider is skipped when it errors, when it does not have the file, or
/// when its copy fails to decode. So a file that is missing or broken
/// remotely can still be served from the checkout.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ContentStore>>,
}

/// Result of [`ProviderChain::find`].
#[derive(Debug)]
pub enum Lookup<T, E> {
    Found {
        value: T,
        sha: Option<VersionToken>,
        provider: &'static str,
    },
    /// At least one provider had the file but no copy decoded. Holds the
    /// last decode error.
    Undecodable(E),
    Missing,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn ContentStore>>) -> Self {
        Self { providers }
    }

    /// First provider whose copy of `path` decodes. Store errors only
    /// surface when every provider failed.
    pub async fn find<T, E, F>(&self, path: &str, decode: F) -> StoreResult<Lookup<T, E>>
    where
        E: fmt::Display,
        F: Fn(&[u8]) -> Result<T, E>,
    {
        let mut last_error: Option<StoreError> = None;
        let mut undecodable: Option<E> = None;
        let mut answered = false;

        for provider in &self.providers {
            let file = match provider.get(path).await {
                Ok(Some(file)) => file,
                Ok(None) => {
                    answered = true;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(provider = provider.name(), path, error = %err, "provider unavailable, trying next");
                    last_error = Some(err);
                    continue;
                }
            };
            match decode(&file.content) {
                Ok(value) => {
                    tracing::debug!(provider = provider.name(), path, "served from provider");
                    return Ok(Lookup::Found {
                        value,
                        sha: file.sha,
                        provider: provider.name(),
                    });
                }
                Err(err) => {
                    tracing::warn!(provider = provider.name(), path, error = %err, "undecodable copy, trying next");
                    undecodable = Some(err);
                }
            }
        }

        match (undecodable, last_error) {
            (Some(err), _) => Ok(Lookup::Undecodable(err)),
            (None, Some(err)) if !answered => Err(err),
            _ => Ok(Lookup::Missing),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::{FileEntry, LocalStore, MemoryStore, StoredFile};
    use async_trait::async_trait;

    /// A store whose every call fails, standing in for an unreachable remote.
    pub(crate) struct DownStore;

    fn down() -> StoreError {
        StoreError::Rejected {
            backend: "down",
            operation: "any",
            path: String::new(),
            status: 503,
            message: "unavailable".into(),
        }
    }

    #[async_trait]
    impl ContentStore for DownStore {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn list(&self, _dir: &str, _extension: &str) -> StoreResult<Vec<FileEntry>> {
            Err(down())
        }

        async fn get(&self, _path: &str) -> StoreResult<Option<StoredFile>> {
            Err(down())
        }

        async fn put(
            &self,
            _path: &str,
            _content: &[u8],
            _message: &str,
            _sha: Option<&VersionToken>,
        ) -> StoreResult<VersionToken> {
            Err(down())
        }

        async fn delete(
            &self,
            _path: &str,
            _message: &str,
            _sha: &VersionToken,
        ) -> StoreResult<()> {
            Err(down())
        }
    }

    fn utf8(bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
        std::str::from_utf8(bytes).map(str::to_string)
    }

    fn number(bytes: &[u8]) -> Result<u32, String> {
        utf8(bytes)
            .map_err(|e| e.to_string())?
            .parse()
            .map_err(|e: std::num::ParseIntError| e.to_string())
    }

    #[tokio::test]
    async fn first_hit_wins() {
        let first = Arc::new(MemoryStore::new());
        let second = Arc::new(MemoryStore::new());
        first.seed("a.json", "first").await;
        second.seed("a.json", "second").await;

        let chain = ProviderChain::new(vec![first, second]);
        let Lookup::Found { value, sha, .. } = chain.find("a.json", utf8).await.unwrap() else {
            panic!("expected a hit");
        };
        assert_eq!(value, "first");
        assert!(sha.is_some());
    }

    #[tokio::test]
    async fn falls_back_when_provider_is_down() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "local").unwrap();

        let chain = ProviderChain::new(vec![
            Arc::new(DownStore),
            Arc::new(LocalStore::new(dir.path())),
        ]);
        let Lookup::Found {
            value,
            sha,
            provider,
        } = chain.find("a.json", utf8).await.unwrap()
        else {
            panic!("expected a hit");
        };
        assert_eq!(value, "local");
        assert_eq!(sha, None);
        assert_eq!(provider, "local");
    }

    #[tokio::test]
    async fn falls_back_when_file_is_missing_remotely() {
        let remote = Arc::new(MemoryStore::new());
        let local = Arc::new(MemoryStore::new());
        local.seed("a.json", "local").await;

        let chain = ProviderChain::new(vec![remote, local]);
        assert!(matches!(
            chain.find("a.json", utf8).await.unwrap(),
            Lookup::Found { value, .. } if value == "local"
        ));
    }

    #[tokio::test]
    async fn falls_back_when_remote_copy_is_broken() {
        let remote = Arc::new(MemoryStore::new());
        let local = Arc::new(MemoryStore::new());
        remote.seed("n.txt", "not a number").await;
        local.seed("n.txt", "42").await;

        let chain = ProviderChain::new(vec![remote.clone(), local]);
        assert!(matches!(
            chain.find("n.txt", number).await.unwrap(),
            Lookup::Found { value: 42, .. }
        ));

        let chain = ProviderChain::new(vec![remote, Arc::new(MemoryStore::new())]);
        assert!(matches!(
            chain.find("n.txt", number).await.unwrap(),
            Lookup::Undecodable(_)
        ));
    }

    #[tokio::test]
    async fn missing_everywhere_is_missing_and_all_down_is_error() {
        let chain = ProviderChain::new(vec![Arc::new(DownStore), Arc::new(MemoryStore::new())]);
        assert!(matches!(
            chain.find("a.json", utf8).await.unwrap(),
            Lookup::Missing
        ));

        let chain = ProviderChain::new(vec![Arc::new(DownStore)]);
        assert!(chain.find("a.json", utf8).await.is_err());
    }
}
