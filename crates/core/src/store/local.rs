//! Read-only view of the deployed site checkout.
//!
//! Serves the public read routes and backs up admin config reads when the
//! remote store is unreachable. All mutation goes through the remote store,
//! since local edits would be lost on the next deploy.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{ContentStore, FileEntry, StoreError, StoreResult, StoredFile, VersionToken};

const BACKEND: &str = "local";

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn io_error(path: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            backend: BACKEND,
            path: path.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ContentStore for LocalStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn list(&self, dir: &str, extension: &str) -> StoreResult<Vec<FileEntry>> {
        let mut entries = match tokio::fs::read_dir(self.resolve(dir)).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Self::io_error(dir, err)),
        };

        let suffix = format!(".{extension}");
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::io_error(dir, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_file && name.ends_with(&suffix) {
                files.push(FileEntry { name, sha: None });
            }
        }
        // read_dir order is platform dependent
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn get(&self, path: &str) -> StoreResult<Option<StoredFile>> {
        match tokio::fs::read(self.resolve(path)).await {
            Ok(content) => Ok(Some(StoredFile {
                path: path.to_string(),
                content,
                sha: None,
            })),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(path, err)),
        }
    }

    async fn put(
        &self,
        _path: &str,
        _content: &[u8],
        _message: &str,
        _sha: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        Err(StoreError::ReadOnly { backend: BACKEND })
    }

    async fn delete(&self, _path: &str, _message: &str, _sha: &VersionToken) -> StoreResult<()> {
        Err(StoreError::ReadOnly { backend: BACKEND })
    }
}
