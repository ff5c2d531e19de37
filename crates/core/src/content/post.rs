use serde::{Deserialize, Serialize};

use super::block::Block;
use super::slug::Slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

/// Lightweight listing entry for a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    pub slug: Slug,
    pub title: String,
    pub description: String,
    /// ISO `YYYY-MM-DD`. Compared as a string when listing.
    pub date: String,
    pub tags: Vec<String>,
    pub locale: Locale,
}

/// Post body: either editor blocks or raw markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostBody {
    #[serde(rename = "blocks")]
    Blocks(Vec<Block>),
    #[serde(rename = "content")]
    Markdown(String),
}

impl Default for PostBody {
    fn default() -> Self {
        PostBody::Blocks(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub meta: PostMeta,
    pub body: PostBody,
}

impl BlogPost {
    pub fn slug(&self) -> &Slug {
        &self.meta.slug
    }
}
