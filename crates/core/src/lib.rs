//! Content persistence and rendering for the portfolio site.
//!
//! Blog posts and the singleton site configuration live as files in a
//! version-controlled repository. [`service::ContentService`] reads and
//! commits them through a [`store::ContentStore`], falling back to a local
//! checkout for reads when the remote is unreachable.

pub mod content;
pub mod render;
pub mod service;
pub mod store;

pub use content::{Block, BlogPost, Locale, PostBody, PostMeta, SiteConfig, Slug};
pub use service::{ContentKind, ContentService, ServiceError};
pub use store::{ContentStore, StoreError, VersionToken};
