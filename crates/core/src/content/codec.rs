//! On-disk formats for stored content.
//!
//! Blog posts are stored one file per slug, either as a JSON document
//! (`{slug}.json`) or as YAML front matter followed by markdown
//! (`{slug}.md`). The site configuration is always a single JSON document.
//! JSON is written with two-space indentation so commits diff cleanly.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::block::Block;
use super::post::{BlogPost, Locale, PostBody, PostMeta};
use super::site_config::SiteConfig;
use super::slug::Slug;

const FENCE: &str = "---";
const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("document is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("markdown document has no front matter block")]
    MissingFrontMatter,
    #[error("block content cannot be stored as markdown")]
    BlocksInMarkdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostFormat {
    #[default]
    Json,
    Markdown,
}

impl PostFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PostFormat::Json => "json",
            PostFormat::Markdown => "md",
        }
    }

    pub fn encode(self, post: &BlogPost) -> Result<Vec<u8>, CodecError> {
        match self {
            PostFormat::Json => encode_json(post),
            PostFormat::Markdown => encode_markdown(post),
        }
    }

    pub fn decode(self, slug: Slug, bytes: &[u8]) -> Result<BlogPost, CodecError> {
        match self {
            PostFormat::Json => decode_json(slug, bytes),
            PostFormat::Markdown => decode_markdown(slug, bytes),
        }
    }
}

impl FromStr for PostFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(PostFormat::Json),
            "markdown" | "md" => Ok(PostFormat::Markdown),
            other => Err(format!("unknown post format {other:?}, expected json or markdown")),
        }
    }
}

/// Stored post fields. Everything is optional on read so that hand-edited
/// files with missing or null fields still list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PostDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    locale: Option<Locale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl PostDocument {
    fn from_meta(meta: &PostMeta) -> Self {
        Self {
            title: Some(meta.title.clone()),
            description: Some(meta.description.clone()),
            date: Some(meta.date.clone()),
            tags: Some(meta.tags.clone()),
            locale: Some(meta.locale),
            blocks: None,
            content: None,
        }
    }

    fn into_meta(self, slug: Slug) -> (PostMeta, Option<Vec<Block>>, Option<String>) {
        let meta = PostMeta {
            slug,
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: self.description.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            locale: self.locale.unwrap_or_default(),
        };
        (meta, self.blocks, self.content)
    }
}

fn encode_json(post: &BlogPost) -> Result<Vec<u8>, CodecError> {
    let mut doc = PostDocument::from_meta(&post.meta);
    match &post.body {
        PostBody::Blocks(blocks) => doc.blocks = Some(blocks.clone()),
        PostBody::Markdown(text) => doc.content = Some(text.clone()),
    }
    Ok(serde_json::to_vec_pretty(&doc)?)
}

fn decode_json(slug: Slug, bytes: &[u8]) -> Result<BlogPost, CodecError> {
    let doc: PostDocument = serde_json::from_slice(bytes)?;
    let (meta, blocks, content) = doc.into_meta(slug);
    let body = match (blocks, content) {
        (Some(blocks), _) => PostBody::Blocks(blocks),
        (None, Some(text)) => PostBody::Markdown(text),
        (None, None) => PostBody::default(),
    };
    Ok(BlogPost { meta, body })
}

fn encode_markdown(post: &BlogPost) -> Result<Vec<u8>, CodecError> {
    let body = match &post.body {
        PostBody::Markdown(text) => text.as_str(),
        PostBody::Blocks(blocks) if blocks.is_empty() => "",
        PostBody::Blocks(_) => return Err(CodecError::BlocksInMarkdown),
    };
    let front = serde_yaml::to_string(&PostDocument::from_meta(&post.meta))?;
    Ok(format!("{FENCE}\n{front}{FENCE}\n{body}").into_bytes())
}

fn decode_markdown(slug: Slug, bytes: &[u8]) -> Result<BlogPost, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    let (front, body) = split_front_matter(text).ok_or(CodecError::MissingFrontMatter)?;
    let doc: PostDocument = if front.trim().is_empty() {
        PostDocument::default()
    } else {
        serde_yaml::from_str(front)?
    };
    let (meta, _, _) = doc.into_meta(slug);
    Ok(BlogPost {
        meta,
        body: PostBody::Markdown(body.to_string()),
    })
}

/// Split `---\n<yaml>---\n<body>` into its YAML and body parts.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

pub fn encode_config(config: &SiteConfig) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec_pretty(config)?)
}

pub fn decode_config(bytes: &[u8]) -> Result<SiteConfig, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
