use crate::block::{Block, Span};
use crate::config::Config;

/// A block, or a run of adjacent list items rendered as one Typst list.
enum Unit<'a> {
    Single(&'a Block),
    List { ordered: bool, items: &'a [Block] },
}

fn group_units(blocks: &[Block]) -> Vec<Unit<'_>> {
    let mut units = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        if let Some(ordered) = blocks[i].list_ordering() {
            let run = blocks[i..]
                .iter()
                .take_while(|b| b.list_ordering() == Some(ordered))
                .count();
            units.push(Unit::List {
                ordered,
                items: &blocks[i..i + run],
            });
            i += run;
        } else {
            units.push(Unit::Single(&blocks[i]));
            i += 1;
        }
    }
    units
}

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    let units = group_units(blocks);
    let mut i = 0;
    while i < units.len() {
        let unit = &units[i];

        match unit {
            Unit::Single(block)
                if config.layout.keep_headings_with_next
                    && matches!(block, Block::Heading { .. }) =>
            {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                if i + 1 < units.len() {
                    i += 1;
                    emit_unit(&units[i], config, false, &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => emit_unit(unit, config, true, &mut out),
        }

        i += 1;
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str(&format!(
        "#show link: set text(fill: rgb(\"{}\"))\n",
        escape_string(&config.links.color)
    ));
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
}

/// `wrap_lists` is false inside a heading's keep-together block, which is
/// already unbreakable.
fn emit_unit(unit: &Unit<'_>, config: &Config, wrap_lists: bool, out: &mut String) {
    match unit {
        Unit::Single(block) => emit_block(block, out),
        Unit::List { ordered, items } => {
            // Wrap list to keep together when small, allow breaks when large
            if wrap_lists && items.len() <= config.layout.unbreakable_list_max {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(items, *ordered, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(items, *ordered, out);
                out.push('\n');
            }
        }
    }
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::CodeBlock { language, lines } => {
            // Keep code blocks together when possible
            let fence = raw_fence(lines);
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::Table { headers, rows } => {
            // Keep tables together when possible
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(headers, rows, out);
            out.push_str("]\n\n");
        }
        Block::Blockquote { paragraphs } => {
            out.push_str("#quote(block: true)[\n");
            for (idx, paragraph) in paragraphs.iter().enumerate() {
                if idx > 0 {
                    out.push_str("\n\n");
                }
                spans_to_typst(paragraph, out);
            }
            out.push_str("\n]\n\n");
        }
        Block::Rule => {
            out.push_str("#line(length: 100%)\n\n");
        }
        Block::CheckboxItem { checked, content } => {
            out.push_str(if *checked { "\u{2611} " } else { "\u{2610} " });
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::UnorderedItem { .. } | Block::OrderedItem { .. } => {
            let ordered = block.list_ordering() == Some(true);
            list_to_typst(std::slice::from_ref(block), ordered, out);
            out.push('\n');
        }
    }
}

/// A backtick fence longer than any backtick run inside the code.
fn raw_fence(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|line| line.split(|c| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Where a text span sits relative to the markup before it.
#[derive(Clone, Copy)]
enum Position {
    /// First on a line, where `- ` or `1. ` would start a list.
    LineStart,
    /// Right after a `#func(..)` or `#func[..]` call, where a leading `.`
    /// or `(` would extend the call.
    AfterCall,
    Inline,
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    let mut position = Position::LineStart;
    for span in spans {
        span_to_typst(span, position, out);
        position = if matches!(span, Span::Text(_)) {
            Position::Inline
        } else {
            Position::AfterCall
        };
    }
}

fn span_to_typst(span: &Span, position: Position, out: &mut String) {
    match span {
        Span::Text(text) => {
            let rest = match position {
                Position::LineStart => escape_list_marker(text, out),
                Position::AfterCall if text.starts_with(['.', '(']) => {
                    out.push('\\');
                    text.as_str()
                }
                _ => text.as_str(),
            };
            escape_text(rest, out);
        }
        Span::Bold(text) => {
            out.push_str("#strong[");
            escape_text(text, out);
            out.push(']');
        }
        Span::Italic(text) => {
            out.push_str("#emph[");
            escape_text(text, out);
            out.push(']');
        }
        Span::Code(text) => {
            out.push_str("#raw(\"");
            out.push_str(&escape_string(text));
            out.push_str("\")");
        }
        Span::Link { text, url } => {
            out.push_str("#link(\"");
            out.push_str(&escape_string(url));
            out.push_str("\")[");
            escape_text(text, out);
            out.push(']');
        }
    }
}

/// Write a leading `-` or `<digits>.` marker of `text` in escaped form and
/// return what follows it. Other text is returned untouched.
fn escape_list_marker<'a>(text: &'a str, out: &mut String) -> &'a str {
    let body = text.trim_start();
    let indent = &text[..text.len() - body.len()];
    let marker_end = |rest: &str| rest.is_empty() || rest.starts_with(char::is_whitespace);

    if let Some(rest) = body.strip_prefix('-')
        && marker_end(rest)
    {
        out.push_str(indent);
        out.push_str("\\-");
        return rest;
    }

    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0
        && let Some(rest) = body[digits..].strip_prefix('.')
        && marker_end(rest)
    {
        out.push_str(indent);
        out.push_str(&body[..digits]);
        out.push_str("\\.");
        return rest;
    }

    text
}

/// Escape special Typst markup characters
fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '/' | '~'
            | '+' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Escape a value for a Typst string literal
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn list_to_typst(items: &[Block], ordered: bool, out: &mut String) {
    let marker = if ordered { "+" } else { "-" };

    for item in items {
        let (indent, content) = match item {
            Block::UnorderedItem { indent, content } => (*indent, content),
            Block::OrderedItem { content } => (0, content),
            _ => continue,
        };
        out.push_str(&" ".repeat(indent));
        out.push_str(marker);
        out.push(' ');
        spans_to_typst(content, out);
        out.push('\n');
    }
}

fn table_to_typst(headers: &[Vec<Span>], rows: &[Vec<Vec<Span>>], out: &mut String) {
    let col_count = headers.len();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    // Header cells (bold)
    for cell in headers {
        out.push_str("  [*");
        spans_to_typst(cell, out);
        out.push_str("*],\n");
    }

    // Data rows, padded or cut to the header width
    for row in rows {
        for idx in 0..col_count {
            out.push_str("  [");
            if let Some(cell) = row.get(idx) {
                spans_to_typst(cell, out);
            }
            out.push_str("],\n");
        }
    }

    out.push_str(")\n");
}
