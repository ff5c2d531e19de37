//! Content model: blog posts, editor blocks and the site configuration.

pub mod block;
pub mod codec;
pub mod post;
pub mod site_config;
pub mod slug;
pub mod validate;

pub use block::{Block, BlockContent, ListItem, ListStyle};
pub use codec::{CodecError, PostFormat};
pub use post::{BlogPost, Locale, PostBody, PostMeta};
pub use site_config::{
    About, Footer, Hero, Localized, ProjectCategory, ProjectConfig, SiteConfig, Skill,
};
pub use slug::Slug;
pub use validate::ValidationError;
