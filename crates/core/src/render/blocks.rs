//! Block list to HTML.
//!
//! Header, paragraph, list and quote text comes from the rich-text editor
//! and already holds valid inline markup, so it is emitted as-is. Code is
//! typed verbatim by the author and is the one payload that gets escaped.

use crate::content::{Block, BlockContent, ListItem, ListStyle};

/// Render blocks in order, one per line. Unknown blocks render as nothing.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> String {
    match block.content() {
        BlockContent::Header { level, text } => format!("<h{level}>{text}</h{level}>"),
        BlockContent::Paragraph { text } => format!("<p>{text}</p>"),
        BlockContent::List { style, items } => {
            let mut html = String::new();
            render_list(*style, items, &mut html);
            html
        }
        BlockContent::Code { code } => {
            format!("<pre><code>{}</code></pre>", escape_html(code))
        }
        BlockContent::Quote { text, caption } => match caption {
            Some(caption) => {
                format!("<blockquote><p>{text}</p><cite>{caption}</cite></blockquote>")
            }
            None => format!("<blockquote><p>{text}</p></blockquote>"),
        },
        BlockContent::Delimiter => "<hr />".to_string(),
        BlockContent::Unknown => String::new(),
    }
}

/// Nested items render as a list of the same style inside their parent `<li>`.
fn render_list(style: ListStyle, items: &[ListItem], html: &mut String) {
    let tag = match style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered | ListStyle::Checklist => "ul",
    };
    html.push_str(&format!("<{tag}>"));
    for item in items {
        html.push_str("<li>");
        html.push_str(&item.content);
        if !item.items.is_empty() {
            render_list(style, &item.items, html);
        }
        html.push_str("</li>");
    }
    html.push_str(&format!("</{tag}>"));
}

/// Escape `&`, `<`, `>` and `"` for literal display.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
