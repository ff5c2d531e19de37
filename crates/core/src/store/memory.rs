//! In-process store with the remote store's token semantics.
//!
//! Used by `STORE_BACKEND=memory` for local development and throughout the
//! tests. Each check-and-write happens under one write lock, so concurrent
//! writers race the same way they do against the remote API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{join_path, ContentStore, FileEntry, StoreError, StoreResult, StoredFile, VersionToken};

const BACKEND: &str = "memory";

#[derive(Debug, Clone)]
struct Entry {
    content: Vec<u8>,
    sha: VersionToken,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a file without any token check, returning its new token.
    pub async fn seed(&self, path: &str, content: impl Into<Vec<u8>>) -> VersionToken {
        let sha = next_token();
        self.files.write().await.insert(
            path.to_string(),
            Entry {
                content: content.into(),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

fn next_token() -> VersionToken {
    VersionToken::new(Uuid::new_v4().simple().to_string())
}

fn rejected(operation: &'static str, path: &str, status: u16, message: &str) -> StoreError {
    StoreError::Rejected {
        backend: BACKEND,
        operation,
        path: path.to_string(),
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn list(&self, dir: &str, extension: &str) -> StoreResult<Vec<FileEntry>> {
        let prefix = join_path(dir, "");
        let suffix = format!(".{extension}");
        let files = self.files.read().await;
        Ok(files
            .iter()
            .filter_map(|(path, entry)| {
                let name = path.strip_prefix(&prefix)?;
                (!name.contains('/') && name.ends_with(&suffix)).then(|| FileEntry {
                    name: name.to_string(),
                    sha: Some(entry.sha.clone()),
                })
            })
            .collect())
    }

    async fn get(&self, path: &str) -> StoreResult<Option<StoredFile>> {
        let files = self.files.read().await;
        Ok(files.get(path).map(|entry| StoredFile {
            path: path.to_string(),
            content: entry.content.clone(),
            sha: Some(entry.sha.clone()),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        _message: &str,
        sha: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        let mut files = self.files.write().await;
        match (files.get(path), sha) {
            (Some(_), None) => {
                return Err(rejected("put", path, 422, "sha wasn't supplied"));
            }
            (Some(entry), Some(sha)) if entry.sha != *sha => {
                return Err(rejected("put", path, 409, "sha does not match"));
            }
            (None, Some(_)) => {
                return Err(rejected("put", path, 409, "file does not exist"));
            }
            _ => {}
        }

        let new_sha = next_token();
        files.insert(
            path.to_string(),
            Entry {
                content: content.to_vec(),
                sha: new_sha.clone(),
            },
        );
        Ok(new_sha)
    }

    async fn delete(&self, path: &str, _message: &str, sha: &VersionToken) -> StoreResult<()> {
        let mut files = self.files.write().await;
        match files.get(path) {
            None => Err(rejected("delete", path, 404, "Not Found")),
            Some(entry) if entry.sha != *sha => {
                Err(rejected("delete", path, 409, "sha does not match"))
            }
            Some(_) => {
                files.remove(path);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_update_with_token() {
        let store = MemoryStore::new();
        let first = store.put("a.json", b"1", "Create", None).await.unwrap();
        let second = store.put("a.json", b"2", "Update", Some(&first)).await.unwrap();
        assert_ne!(first, second);

        let file = store.get("a.json").await.unwrap().unwrap();
        assert_eq!(file.content, b"2");
        assert_eq!(file.sha, Some(second));
    }

    #[tokio::test]
    async fn stale_or_missing_token_is_rejected() {
        let store = MemoryStore::new();
        let first = store.put("a.json", b"1", "Create", None).await.unwrap();
        store.put("a.json", b"2", "Update", Some(&first)).await.unwrap();

        let stale = store.put("a.json", b"3", "Update", Some(&first)).await;
        assert!(matches!(stale, Err(StoreError::Rejected { status: 409, .. })));

        let missing = store.put("a.json", b"3", "Update", None).await;
        assert!(matches!(missing, Err(StoreError::Rejected { status: 422, .. })));
    }

    #[tokio::test]
    async fn delete_checks_token() {
        let store = MemoryStore::new();
        let sha = store.seed("a.json", "x").await;

        let wrong = store
            .delete("a.json", "Delete", &VersionToken::new("nope"))
            .await;
        assert!(wrong.is_err());
        assert!(store.get("a.json").await.unwrap().is_some());

        store.delete("a.json", "Delete", &sha).await.unwrap();
        assert!(store.get("a.json").await.unwrap().is_none());
        assert!(store.delete("a.json", "Delete", &sha).await.is_err());
    }

    #[tokio::test]
    async fn list_is_shallow_and_filtered() {
        let store = MemoryStore::new();
        store.seed("content/blog/a.json", "{}").await;
        store.seed("content/blog/b.md", "").await;
        store.seed("content/blog/drafts/c.json", "{}").await;
        store.seed("content/site-config.json", "{}").await;

        let names: Vec<_> = store
            .list("content/blog", "json")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.json"]);
        assert!(store.list("missing", "json").await.unwrap().is_empty());
    }
}
