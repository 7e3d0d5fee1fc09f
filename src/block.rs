use serde::Serialize;

/// Inline text spans with formatting. Spans never nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
}

impl Span {
    /// The visible text of the span, with markup delimiters removed.
    pub fn text(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) | Span::Italic(text) | Span::Code(text) => text,
            Span::Link { text, .. } => text,
        }
    }
}

/// Concatenate the visible text of a span sequence.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Block-level elements parsed from lesson Markdown.
///
/// List items are emitted one node per source line; grouping consecutive
/// items into a list is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
    },
    Paragraph {
        content: Vec<Span>,
    },
    /// Fenced code, kept verbatim. Lines are never inline-parsed.
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table {
        headers: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Blockquote {
        paragraphs: Vec<Vec<Span>>,
    },
    Rule,
    CheckboxItem {
        checked: bool,
        content: Vec<Span>,
    },
    /// `indent` counts the whitespace characters before the dash.
    UnorderedItem {
        indent: usize,
        content: Vec<Span>,
    },
    OrderedItem {
        content: Vec<Span>,
    },
}

impl Block {
    /// `Some(ordered)` for list items, `None` for every other block.
    pub(crate) fn list_ordering(&self) -> Option<bool> {
        match self {
            Block::UnorderedItem { .. } => Some(false),
            Block::OrderedItem { .. } => Some(true),
            _ => None,
        }
    }
}
