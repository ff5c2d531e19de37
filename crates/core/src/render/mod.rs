//! HTML rendering for post bodies.

pub mod blocks;
pub mod markdown;

pub use blocks::{escape_html, render_blocks};
pub use markdown::render_markdown;

use crate::content::PostBody;

/// Render a post body, whichever form it is stored in.
pub fn render_body(body: &PostBody) -> String {
    match body {
        PostBody::Blocks(blocks) => render_blocks(blocks),
        PostBody::Markdown(text) => render_markdown(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, BlockContent};

    #[test]
    fn dispatches_on_body_form() {
        let blocks = PostBody::Blocks(vec![Block::from(BlockContent::Paragraph {
            text: "hi".into(),
        })]);
        assert_eq!(render_body(&blocks), "<p>hi</p>");

        let markdown = PostBody::Markdown("hi".into());
        assert_eq!(render_body(&markdown), "<p>hi</p>\n");
    }
}
