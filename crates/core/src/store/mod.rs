//! File-level storage backends.
//!
//! Content is addressed by repository-relative paths such as
//! `content/blog/hello.json`. Every backend speaks the same optimistic
//! concurrency protocol: a read returns the file's [`VersionToken`], and a
//! write to an existing file must present the token it last read. The store
//! rejects the write if the file changed in between, so the first writer to
//! commit wins and later writers must reload.

pub mod chain;
pub mod github;
pub mod local;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chain::{Lookup, ProviderChain};
pub use github::{GitHubConfig, GitHubStore};
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Opaque identifier of a stored file's exact content (the git blob `sha`
/// for the remote store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Treat an empty string as "no token", the way form posts send it.
    pub fn from_optional(token: Option<String>) -> Option<Self> {
        token.filter(|t| !t.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file read from a store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: String,
    pub content: Vec<u8>,
    /// `None` when the backend does not version its files.
    pub sha: Option<VersionToken>,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub sha: Option<VersionToken>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend answered with a non-success status. Stale tokens,
    /// missing files on delete and permission problems all land here.
    #[error("{backend} rejected {operation} {path}: {status} {message}")]
    Rejected {
        backend: &'static str,
        operation: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    #[error("{backend} request failed: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} returned an unreadable response: {message}")]
    Decode {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} is read-only")]
    ReadOnly { backend: &'static str },

    #[error("{backend} I/O error on {path}: {source}")]
    Io {
        backend: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A backend holding content files.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// List the files directly under `dir` whose name ends in `.{extension}`.
    /// A directory that does not exist lists as empty.
    async fn list(&self, dir: &str, extension: &str) -> StoreResult<Vec<FileEntry>>;

    /// Read one file. `Ok(None)` means the file does not exist.
    async fn get(&self, path: &str) -> StoreResult<Option<StoredFile>>;

    /// Create (`sha` is `None`) or replace (`sha` is the token last read) a
    /// file, returning the token of the newly written content.
    async fn put(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&VersionToken>,
    ) -> StoreResult<VersionToken>;

    /// Delete a file whose current token is `sha`.
    async fn delete(&self, path: &str, message: &str, sha: &VersionToken) -> StoreResult<()>;
}

/// Join a directory and file name into a store path.
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_absent() {
        assert_eq!(VersionToken::from_optional(None), None);
        assert_eq!(VersionToken::from_optional(Some(String::new())), None);
        assert_eq!(
            VersionToken::from_optional(Some("abc".into())),
            Some(VersionToken::new("abc"))
        );
    }

    #[test]
    fn join_handles_trailing_slash_and_root() {
        assert_eq!(join_path("content/blog/", "a.json"), "content/blog/a.json");
        assert_eq!(join_path("content/blog", "a.json"), "content/blog/a.json");
        assert_eq!(join_path("", "a.json"), "a.json");
    }
}
