use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One unit of block-editor content.
///
/// A block keeps the editor's wire object exactly as received: `id`, `data`
/// and any sibling keys such as `tunes` are written back unchanged. The
/// typed [`BlockContent`] view is derived from `data` on parse and is what
/// the renderer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct Block {
    id: Option<String>,
    kind: String,
    data: Value,
    extra: Map<String, Value>,
    content: BlockContent,
}

/// Typed view of a block's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Header { level: u8, text: String },
    Paragraph { text: String },
    List { style: ListStyle, items: Vec<ListItem> },
    Code { code: String },
    Quote { text: String, caption: Option<String> },
    Delimiter,
    /// A block type without a renderer. Its payload is still kept.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
    Checklist,
}

impl ListStyle {
    fn parse(raw: &str) -> Self {
        match raw {
            "ordered" => ListStyle::Ordered,
            "checklist" => ListStyle::Checklist,
            _ => ListStyle::Unordered,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
            ListStyle::Checklist => "checklist",
        }
    }
}

/// A list entry and its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "WireListItem")]
pub struct ListItem {
    pub content: String,
    pub items: Vec<ListItem>,
}

impl ListItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            items: Vec::new(),
        }
    }

    fn to_value(&self) -> Value {
        let items: Vec<Value> = self.items.iter().map(ListItem::to_value).collect();
        json!({ "content": self.content, "meta": {}, "items": items })
    }
}

/// List items are plain strings in older editor versions and
/// `{"content", "meta", "items"}` objects in newer ones. Checklist items
/// from the standalone checklist tool use `text`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireListItem {
    Text(String),
    Object {
        #[serde(default, alias = "text")]
        content: String,
        #[serde(default)]
        items: Vec<ListItem>,
    },
}

impl From<WireListItem> for ListItem {
    fn from(wire: WireListItem) -> Self {
        match wire {
            WireListItem::Text(content) => ListItem::new(content),
            WireListItem::Object { content, items } => ListItem { content, items },
        }
    }
}

impl Block {
    /// The editor's type tag for this block.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    /// The payload as stored.
    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl From<BlockContent> for Block {
    fn from(content: BlockContent) -> Self {
        let (kind, data) = match &content {
            BlockContent::Header { level, text } => {
                ("header", json!({ "text": text, "level": level }))
            }
            BlockContent::Paragraph { text } => ("paragraph", json!({ "text": text })),
            BlockContent::List { style, items } => {
                let items: Vec<Value> = items.iter().map(ListItem::to_value).collect();
                ("list", json!({ "style": style.as_str(), "meta": {}, "items": items }))
            }
            BlockContent::Code { code } => ("code", json!({ "code": code })),
            BlockContent::Quote { text, caption } => (
                "quote",
                json!({ "text": text, "caption": caption.as_deref().unwrap_or_default() }),
            ),
            BlockContent::Delimiter => ("delimiter", json!({})),
            BlockContent::Unknown => ("unknown", json!({})),
        };
        Block {
            id: None,
            kind: kind.to_string(),
            data,
            extra: Map::new(),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_header_level() -> u8 {
    2
}

#[derive(Deserialize)]
struct HeaderData {
    #[serde(default)]
    text: String,
    #[serde(default = "default_header_level")]
    level: u8,
}

#[derive(Deserialize)]
struct TextData {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ListData {
    #[serde(default)]
    style: String,
    #[serde(default)]
    items: Vec<ListItem>,
}

#[derive(Deserialize)]
struct CodeData {
    #[serde(default)]
    code: String,
}

#[derive(Deserialize)]
struct QuoteData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    caption: Option<String>,
}

fn parse_content(kind: &str, data: &Value) -> Result<BlockContent, serde_json::Error> {
    let content = match kind {
        "header" => {
            let HeaderData { text, level } = HeaderData::deserialize(data)?;
            BlockContent::Header { level, text }
        }
        "paragraph" => {
            let TextData { text } = TextData::deserialize(data)?;
            BlockContent::Paragraph { text }
        }
        "list" | "checklist" => {
            let ListData { style, items } = ListData::deserialize(data)?;
            let style = if kind == "checklist" {
                ListStyle::Checklist
            } else {
                ListStyle::parse(&style)
            };
            BlockContent::List { style, items }
        }
        "code" => {
            let CodeData { code } = CodeData::deserialize(data)?;
            BlockContent::Code { code }
        }
        "quote" => {
            let QuoteData { text, caption } = QuoteData::deserialize(data)?;
            BlockContent::Quote {
                text,
                caption: caption.filter(|c| !c.is_empty()),
            }
        }
        "delimiter" => BlockContent::Delimiter,
        _ => BlockContent::Unknown,
    };
    Ok(content)
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        // Editors emit `null` data for some payload-less blocks.
        let data = match raw.data {
            Value::Null => json!({}),
            other => other,
        };
        let content = parse_content(&raw.kind, &data)?;
        Ok(Block {
            id: raw.id,
            kind: raw.kind,
            data,
            extra: raw.extra,
            content,
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        RawBlock {
            id: block.id,
            kind: block.kind,
            data: block.data,
            extra: block.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> Block {
        serde_json::from_value(value).unwrap()
    }

    fn round_trip(value: Value) {
        let block = parse(value.clone());
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn parses_editor_output() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            { "id": "a1", "type": "header", "data": { "text": "Intro", "level": 3 } },
            { "id": "a2", "type": "paragraph", "data": { "text": "Some <b>bold</b> text" } },
            { "id": "a3", "type": "delimiter", "data": {} },
        ]))
        .unwrap();

        let contents: Vec<_> = blocks.iter().map(Block::content).cloned().collect();
        assert_eq!(
            contents,
            vec![
                BlockContent::Header {
                    level: 3,
                    text: "Intro".into()
                },
                BlockContent::Paragraph {
                    text: "Some <b>bold</b> text".into()
                },
                BlockContent::Delimiter,
            ]
        );
        assert_eq!(blocks[1].id(), Some("a2"));
    }

    #[test]
    fn header_level_defaults_to_two() {
        assert_eq!(
            parse(json!({ "type": "header", "data": { "text": "Hi" } })).content(),
            &BlockContent::Header {
                level: 2,
                text: "Hi".into()
            }
        );
    }

    #[test]
    fn list_items_accept_strings_and_objects() {
        let block = parse(json!({
            "type": "list",
            "data": { "style": "ordered", "items": ["one", { "content": "two", "items": [] }] }
        }));
        assert_eq!(
            block.content(),
            &BlockContent::List {
                style: ListStyle::Ordered,
                items: vec![ListItem::new("one"), ListItem::new("two")],
            }
        );
    }

    #[test]
    fn nested_list_keeps_children_and_meta() {
        let raw = json!({
            "id": "l1",
            "type": "list",
            "data": {
                "style": "ordered",
                "meta": { "start": 3 },
                "items": [{
                    "content": "parent",
                    "meta": {},
                    "items": [{ "content": "child", "meta": {}, "items": [] }]
                }]
            }
        });
        let block = parse(raw.clone());
        let BlockContent::List { items, .. } = block.content() else {
            panic!("expected a list, got {block:?}");
        };
        assert_eq!(items[0].items[0].content, "child");
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn checklist_style_survives() {
        let raw = json!({
            "type": "list",
            "data": {
                "style": "checklist",
                "items": [{ "content": "done", "meta": { "checked": true }, "items": [] }]
            }
        });
        let block = parse(raw.clone());
        assert!(matches!(
            block.content(),
            BlockContent::List {
                style: ListStyle::Checklist,
                ..
            }
        ));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn standalone_checklist_tool_reads_as_list() {
        let block = parse(json!({
            "type": "checklist",
            "data": { "items": [{ "text": "milk", "checked": false }] }
        }));
        assert_eq!(
            block.content(),
            &BlockContent::List {
                style: ListStyle::Checklist,
                items: vec![ListItem::new("milk")],
            }
        );
        assert_eq!(block.kind(), "checklist");
    }

    #[test]
    fn quote_alignment_and_tunes_are_kept() {
        round_trip(json!({
            "id": "q1",
            "type": "quote",
            "data": { "text": "t", "caption": "c", "alignment": "center" },
            "tunes": { "anchor": "intro" }
        }));
    }

    #[test]
    fn empty_quote_caption_is_none() {
        let block = parse(json!({ "type": "quote", "data": { "text": "q", "caption": "" } }));
        assert_eq!(
            block.content(),
            &BlockContent::Quote {
                text: "q".into(),
                caption: None
            }
        );
    }

    #[test]
    fn unknown_blocks_keep_their_payload() {
        let raw = json!({ "type": "image", "data": { "file": { "url": "https://x/y.png" } } });
        let block = parse(raw.clone());
        assert_eq!(block.kind(), "image");
        assert_eq!(block.content(), &BlockContent::Unknown);
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn delimiter_without_data_parses() {
        assert_eq!(
            parse(json!({ "type": "delimiter" })).content(),
            &BlockContent::Delimiter
        );
        assert_eq!(
            serde_json::to_value(Block::from(BlockContent::Delimiter)).unwrap(),
            json!({ "type": "delimiter", "data": {} })
        );
    }

    #[test]
    fn built_blocks_parse_back_to_the_same_content() {
        let content = BlockContent::List {
            style: ListStyle::Unordered,
            items: vec![ListItem {
                content: "a".into(),
                items: vec![ListItem::new("b")],
            }],
        };
        let value = serde_json::to_value(Block::from(content.clone())).unwrap();
        assert_eq!(parse(value).content(), &content);
    }

    #[test]
    fn wrong_payload_shape_is_an_error() {
        let result: Result<Block, _> =
            serde_json::from_value(json!({ "type": "header", "data": { "text": 5 } }));
        assert!(result.is_err());
    }
}
