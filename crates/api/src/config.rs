use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use folio_core::content::PostFormat;
use folio_core::service::ContentLayout;
use folio_core::store::github::{GitHubConfig, DEFAULT_API_URL};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which store commits are written to.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    GitHub(GitHubConfig),
    /// Process-local store; content is lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// Shared secret for the admin API.
    pub admin_password: String,
    pub store: StoreBackend,
    /// Local checkout of the site repository, read when the remote is down.
    pub content_root: PathBuf,
    pub layout: ContentLayout,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let store = match var("STORE_BACKEND", "github").to_ascii_lowercase().as_str() {
            "github" => StoreBackend::GitHub(GitHubConfig {
                api_url: var("GITHUB_API_URL", DEFAULT_API_URL),
                repo: lookup("GITHUB_REPO")
                    .filter(|r| !r.is_empty())
                    .ok_or(ConfigError::Missing("GITHUB_REPO"))?,
                token: var("GITHUB_TOKEN", ""),
                branch: lookup("GITHUB_BRANCH").filter(|b| !b.is_empty()),
            }),
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected github or memory".to_string(),
                })
            }
        };

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", "3030")?,
            admin_password: var("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            store,
            content_root: PathBuf::from(var("CONTENT_ROOT", ".")),
            layout: ContentLayout {
                blog_dir: var("BLOG_DIR", "content/blog"),
                config_path: var("SITE_CONFIG_PATH", "content/site-config.json"),
                post_format: parse::<PostFormat>(&lookup, "POST_FORMAT", "json")?,
            },
            log_level: var("LOG_LEVEL", "info"),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_password", &"<redacted>")
            .field("store", &self.store)
            .field("content_root", &self.content_root)
            .field("layout", &self.layout)
            .field("log_level", &self.log_level)
            .finish()
    }
}
