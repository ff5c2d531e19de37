//! Content operations over the stores.
//!
//! All writes go to the remote store, which is the system of record. Reads
//! for the admin panel also come from the remote store because they must
//! return a [`VersionToken`]. The admin config read falls back to the local
//! checkout through a [`ProviderChain`]. The public read path never touches
//! the remote when a checkout is configured.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::content::codec::{self, CodecError, PostFormat};
use crate::content::validate::{validate_post, validate_site_config, ValidationError};
use crate::content::{BlogPost, Locale, PostMeta, SiteConfig, Slug};
use crate::store::{
    join_path, ContentStore, FileEntry, Lookup, ProviderChain, StoreError, VersionToken,
};

const CONFIG_ID: &str = "site-config";

/// The two kinds of managed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Blog,
    Config,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Blog => f.write_str("post"),
            ContentKind::Config => f.write_str("site config"),
        }
    }
}

/// Where content lives inside the repository.
#[derive(Debug, Clone)]
pub struct ContentLayout {
    pub blog_dir: String,
    pub config_path: String,
    pub post_format: PostFormat,
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self {
            blog_dir: "content/blog".to_string(),
            config_path: "content/site-config.json".to_string(),
            post_format: PostFormat::Json,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} not found")]
    NotFound { kind: ContentKind, id: String },

    /// A write without a token hit a resource that already exists.
    #[error("{kind} {id} already exists; reload it to get its current sha")]
    MissingVersion { kind: ContentKind, id: String },

    #[error("deleting {kind} {id} requires its sha")]
    TokenRequired { kind: ContentKind, id: String },

    #[error("{0}")]
    UnsupportedBody(CodecError),

    #[error("could not encode {kind} {id}: {source}")]
    Encode {
        kind: ContentKind,
        id: String,
        #[source]
        source: CodecError,
    },

    #[error("stored {kind} {id} is unreadable: {source}")]
    Corrupt {
        kind: ContentKind,
        id: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A document together with the token it was read at. The token is `None`
/// when the document came from the local fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub sha: Option<VersionToken>,
}

/// Listing entry for the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: Slug,
    pub sha: Option<VersionToken>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    pub locale: Locale,
}

impl PostSummary {
    fn new(meta: PostMeta, sha: Option<VersionToken>) -> Self {
        Self {
            slug: meta.slug,
            sha,
            title: meta.title,
            description: meta.description,
            date: meta.date,
            tags: meta.tags,
            locale: meta.locale,
        }
    }
}

pub struct ContentService {
    remote: Arc<dyn ContentStore>,
    /// Serves the public site: the checkout if there is one, else `remote`.
    public: Arc<dyn ContentStore>,
    config_readers: ProviderChain,
    layout: ContentLayout,
}

impl ContentService {
    /// `checkout` serves public reads and backs up admin config reads. It is
    /// never written to.
    pub fn new(
        remote: Arc<dyn ContentStore>,
        checkout: Option<Arc<dyn ContentStore>>,
        layout: ContentLayout,
    ) -> Self {
        let public = checkout.clone().unwrap_or_else(|| Arc::clone(&remote));
        let mut providers = vec![Arc::clone(&remote)];
        providers.extend(checkout);
        Self {
            remote,
            public,
            config_readers: ProviderChain::new(providers),
            layout,
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.remote.name()
    }

    pub fn public_store_name(&self) -> &'static str {
        self.public.name()
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Storage path of a content item. The site config ignores `slug`.
    pub fn path_for(&self, kind: ContentKind, slug: Option<&Slug>) -> String {
        match (kind, slug) {
            (ContentKind::Blog, Some(slug)) => join_path(
                &self.layout.blog_dir,
                &format!("{slug}.{}", self.layout.post_format.extension()),
            ),
            (ContentKind::Blog, None) => self.layout.blog_dir.clone(),
            (ContentKind::Config, _) => self.layout.config_path.clone(),
        }
    }

    // ---------------------------------------------------------------------
    // Blog posts
    // ---------------------------------------------------------------------

    /// Every post in the remote store, newest first. Posts that cannot be
    /// read or decoded are left out.
    pub async fn list_posts(&self) -> ServiceResult<Vec<PostSummary>> {
        let extension = self.layout.post_format.extension();
        let entries = self.remote.list(&self.layout.blog_dir, extension).await?;
        Ok(self.collect_posts(self.remote.as_ref(), entries).await)
    }

    pub async fn get_post(&self, slug: &Slug) -> ServiceResult<Versioned<BlogPost>> {
        let path = self.path_for(ContentKind::Blog, Some(slug));
        let file = self
            .remote
            .get(&path)
            .await?
            .ok_or_else(|| not_found(ContentKind::Blog, slug.as_str()))?;
        let post = self
            .layout
            .post_format
            .decode(slug.clone(), &file.content)
            .map_err(|source| ServiceError::Corrupt {
                kind: ContentKind::Blog,
                id: slug.to_string(),
                source,
            })?;
        Ok(Versioned {
            value: post,
            sha: file.sha,
        })
    }

    /// Create or fully replace a post. Returns the token of the new content.
    pub async fn save_post(
        &self,
        post: &BlogPost,
        sha: Option<VersionToken>,
    ) -> ServiceResult<VersionToken> {
        validate_post(post)?;
        let bytes = self
            .layout
            .post_format
            .encode(post)
            .map_err(|source| match source {
                CodecError::BlocksInMarkdown => ServiceError::UnsupportedBody(source),
                source => ServiceError::Encode {
                    kind: ContentKind::Blog,
                    id: post.slug().to_string(),
                    source,
                },
            })?;
        let path = self.path_for(ContentKind::Blog, Some(post.slug()));
        self.write(ContentKind::Blog, post.slug().as_str(), &path, &bytes, sha)
            .await
    }

    pub async fn delete_post(&self, slug: &Slug, sha: Option<VersionToken>) -> ServiceResult<()> {
        let sha = sha.ok_or_else(|| ServiceError::TokenRequired {
            kind: ContentKind::Blog,
            id: slug.to_string(),
        })?;
        let path = self.path_for(ContentKind::Blog, Some(slug));
        self.remote
            .delete(&path, &format!("Delete: {slug}"), &sha)
            .await?;
        tracing::info!(%slug, "post deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Site configuration
    // ---------------------------------------------------------------------

    /// The config with its token. A remote copy that is unreachable or fails
    /// to decode is skipped in favour of the checkout, whose copy has no token.
    pub async fn get_config(&self) -> ServiceResult<Versioned<SiteConfig>> {
        let path = self.path_for(ContentKind::Config, None);
        match self
            .config_readers
            .find(&path, codec::decode_config)
            .await?
        {
            Lookup::Found { value, sha, .. } => Ok(Versioned { value, sha }),
            Lookup::Undecodable(source) => Err(ServiceError::Corrupt {
                kind: ContentKind::Config,
                id: CONFIG_ID.to_string(),
                source,
            }),
            Lookup::Missing => Err(not_found(ContentKind::Config, CONFIG_ID)),
        }
    }

    pub async fn save_config(
        &self,
        config: &SiteConfig,
        sha: Option<VersionToken>,
    ) -> ServiceResult<VersionToken> {
        validate_site_config(config)?;
        let bytes = codec::encode_config(config).map_err(|source| ServiceError::Encode {
            kind: ContentKind::Config,
            id: CONFIG_ID.to_string(),
            source,
        })?;
        let path = self.path_for(ContentKind::Config, None);
        self.write(ContentKind::Config, CONFIG_ID, &path, &bytes, sha)
            .await
    }

    // ---------------------------------------------------------------------
    // Public read path
    // ---------------------------------------------------------------------

    /// Posts as the public site sees them, optionally in one language.
    pub async fn published_posts(&self, locale: Option<Locale>) -> ServiceResult<Vec<PostMeta>> {
        let extension = self.layout.post_format.extension();
        let entries = self.public.list(&self.layout.blog_dir, extension).await?;
        Ok(self
            .collect_posts(self.public.as_ref(), entries)
            .await
            .into_iter()
            .filter(|p| locale.map_or(true, |l| p.locale == l))
            .map(|p| PostMeta {
                slug: p.slug,
                title: p.title,
                description: p.description,
                date: p.date,
                tags: p.tags,
                locale: p.locale,
            })
            .collect())
    }

    pub async fn published_post(&self, slug: &Slug) -> ServiceResult<BlogPost> {
        let path = self.path_for(ContentKind::Blog, Some(slug));
        let file = self
            .public
            .get(&path)
            .await?
            .ok_or_else(|| not_found(ContentKind::Blog, slug.as_str()))?;
        self.layout
            .post_format
            .decode(slug.clone(), &file.content)
            .map_err(|source| ServiceError::Corrupt {
                kind: ContentKind::Blog,
                id: slug.to_string(),
                source,
            })
    }

    pub async fn published_config(&self) -> ServiceResult<SiteConfig> {
        let path = self.path_for(ContentKind::Config, None);
        let file = self
            .public
            .get(&path)
            .await?
            .ok_or_else(|| not_found(ContentKind::Config, CONFIG_ID))?;
        codec::decode_config(&file.content).map_err(|source| ServiceError::Corrupt {
            kind: ContentKind::Config,
            id: CONFIG_ID.to_string(),
            source,
        })
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    async fn collect_posts(
        &self,
        store: &dyn ContentStore,
        entries: Vec<FileEntry>,
    ) -> Vec<PostSummary> {
        let extension = self.layout.post_format.extension();
        let mut posts = Vec::with_capacity(entries.len());

        for entry in entries {
            let Some(slug) = Slug::from_file_name(&entry.name, extension) else {
                tracing::warn!(name = %entry.name, "skipping file with invalid slug");
                continue;
            };
            let path = join_path(&self.layout.blog_dir, &entry.name);
            let file = match store.get(&path).await {
                Ok(Some(file)) => file,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%path, error = %err, "skipping unreadable post");
                    continue;
                }
            };
            match self.layout.post_format.decode(slug, &file.content) {
                Ok(post) => posts.push(PostSummary::new(post.meta, entry.sha.or(file.sha))),
                Err(err) => tracing::warn!(%path, error = %err, "skipping malformed post"),
            }
        }

        // Stable sort: equal dates keep listing order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    async fn write(
        &self,
        kind: ContentKind,
        id: &str,
        path: &str,
        bytes: &[u8],
        sha: Option<VersionToken>,
    ) -> ServiceResult<VersionToken> {
        let message = match &sha {
            Some(_) => format!("Update: {id}"),
            None => {
                if self.remote.get(path).await?.is_some() {
                    return Err(ServiceError::MissingVersion {
                        kind,
                        id: id.to_string(),
                    });
                }
                format!("Create: {id}")
            }
        };

        let new_sha = self.remote.put(path, bytes, &message, sha.as_ref()).await?;
        tracing::info!(%kind, id, sha = %new_sha, "{message}");
        Ok(new_sha)
    }
}

fn not_found(kind: ContentKind, id: &str) -> ServiceError {
    ServiceError::NotFound {
        kind,
        id: id.to_string(),
    }
}
