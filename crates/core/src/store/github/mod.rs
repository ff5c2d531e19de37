//! Remote store backed by the GitHub repository contents API.
//!
//! Every write is a commit. File bodies travel as base64 and every file
//! carries its git blob `sha`, which GitHub checks atomically on update and
//! delete. Any non-success status is reported as [`StoreError::Rejected`];
//! nothing is retried.

pub mod types;

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};

use self::types::{
    DeleteFileRequest, DirEntry, ErrorResponse, FileResponse, PutFileRequest, PutFileResponse,
};
use super::{ContentStore, FileEntry, StoreError, StoreResult, StoredFile, VersionToken};

const BACKEND: &str = "github";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("folio-cms/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository coordinates and credentials.
#[derive(Clone)]
pub struct GitHubConfig {
    /// API base, `https://api.github.com` unless on GitHub Enterprise.
    pub api_url: String,
    /// `owner/name`.
    pub repo: String,
    pub token: String,
    /// Branch to read and commit to; the repository default when `None`.
    pub branch: Option<String>,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .field("branch", &self.branch)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubStore {
    pub fn new(config: GitHubConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| StoreError::Transport {
                backend: BACKEND,
                source,
            })?;
        Ok(Self { client, config })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo,
            path.trim_start_matches('/'),
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method.clone(), self.contents_url(path))
            .header(ACCEPT, GITHUB_ACCEPT);
        if !self.config.token.is_empty() {
            builder = builder.bearer_auth(&self.config.token);
        }
        if method == Method::GET {
            if let Some(branch) = &self.config.branch {
                builder = builder.query(&[("ref", branch)]);
            }
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        builder.send().await.map_err(|source| StoreError::Transport {
            backend: BACKEND,
            source,
        })
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> StoreResult<T> {
        response.json().await.map_err(|e| StoreError::Decode {
            backend: BACKEND,
            message: e.to_string(),
        })
    }

    async fn rejected(operation: &'static str, path: &str, response: Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorResponse>()
            .await
            .unwrap_or_default()
            .message;
        tracing::warn!(operation, path, status, %message, "GitHub rejected request");
        StoreError::Rejected {
            backend: BACKEND,
            operation,
            path: path.to_string(),
            status,
            message,
        }
    }
}

fn decode_content(file: &FileResponse) -> StoreResult<Vec<u8>> {
    if file.encoding != "base64" {
        return Err(StoreError::Decode {
            backend: BACKEND,
            message: format!(
                "unsupported content encoding {:?}; file may exceed the contents API limit",
                file.encoding
            ),
        });
    }
    let packed: String = file
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(packed).map_err(|e| StoreError::Decode {
        backend: BACKEND,
        message: e.to_string(),
    })
}

#[async_trait]
impl ContentStore for GitHubStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn list(&self, dir: &str, extension: &str) -> StoreResult<Vec<FileEntry>> {
        tracing::debug!(dir, "listing directory");
        let response = self.send(self.request(Method::GET, dir)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(Self::rejected("list", dir, response).await);
        }

        let suffix = format!(".{extension}");
        let entries: Vec<DirEntry> = Self::json(response).await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.kind == "file" && e.name.ends_with(&suffix))
            .map(|e| FileEntry {
                name: e.name,
                sha: Some(VersionToken::new(e.sha)),
            })
            .collect())
    }

    async fn get(&self, path: &str) -> StoreResult<Option<StoredFile>> {
        tracing::debug!(path, "fetching file");
        let response = self.send(self.request(Method::GET, path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::rejected("get", path, response).await);
        }

        let file: FileResponse = Self::json(response).await?;
        let content = decode_content(&file)?;
        Ok(Some(StoredFile {
            path: path.to_string(),
            content,
            sha: Some(VersionToken::new(file.sha)),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        let body = PutFileRequest {
            message,
            content: STANDARD.encode(content),
            sha: sha.map(VersionToken::as_str),
            branch: self.config.branch.as_deref(),
        };
        let response = self
            .send(self.request(Method::PUT, path).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejected("put", path, response).await);
        }

        let committed: PutFileResponse = Self::json(response).await?;
        tracing::info!(path, message, sha = %committed.content.sha, "committed file");
        Ok(VersionToken::new(committed.content.sha))
    }

    async fn delete(&self, path: &str, message: &str, sha: &VersionToken) -> StoreResult<()> {
        let body = DeleteFileRequest {
            message,
            sha: sha.as_str(),
            branch: self.config.branch.as_deref(),
        };
        let response = self
            .send(self.request(Method::DELETE, path).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejected("delete", path, response).await);
        }
        tracing::info!(path, message, "deleted file");
        Ok(())
    }
}
