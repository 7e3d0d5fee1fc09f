use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::block::{Block, Span};
use crate::inline::parse_inline;

/// A table row made of nothing but pipes, dashes, colons and whitespace.
static SEPARATOR_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|[\s\-:|]+\|$").unwrap());

/// Ordered list marker: ASCII digits, a dot, one whitespace character.
static ORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());

const FENCE: &str = "```";

/// Parse lesson Markdown into a flat list of blocks.
///
/// Every line is classified by its own leading characters; multi-line
/// constructs (fences, tables, quotes) advance the cursor past the lines
/// they consume. Never fails: unrecognised lines become paragraphs.
pub fn parse(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (block, next) = parse_block(&lines, i);
        if let Some(block) = block {
            blocks.push(block);
        }
        i = next;
    }

    trace!(lines = lines.len(), blocks = blocks.len(), "parsed document");
    blocks
}

/// Classify the line at `start` and build its block.
///
/// Returns the block (`None` for blank lines) and the index of the first
/// line not consumed. The returned index is always greater than `start`.
fn parse_block(lines: &[&str], start: usize) -> (Option<Block>, usize) {
    let line = lines[start];
    let trimmed = line.trim();
    let leading = line.trim_start();

    if trimmed.starts_with(FENCE) {
        let (block, next) = parse_code_block(lines, start);
        return (Some(block), next);
    }

    if line.contains('|') && trimmed.starts_with('|') {
        let (block, next) = parse_table(lines, start);
        return (Some(block), next);
    }

    if let Some(block) = parse_heading(line) {
        return (Some(block), start + 1);
    }

    if trimmed == "---" {
        return (Some(Block::Rule), start + 1);
    }

    if leading.starts_with("> ") {
        let (block, next) = parse_blockquote(lines, start);
        return (Some(block), next);
    }

    let block = if let Some(rest) = leading.strip_prefix("- [x] ") {
        Block::CheckboxItem {
            checked: true,
            content: parse_inline(rest),
        }
    } else if let Some(rest) = leading.strip_prefix("- [ ] ") {
        Block::CheckboxItem {
            checked: false,
            content: parse_inline(rest),
        }
    } else if let Some(rest) = leading.strip_prefix("- ") {
        Block::UnorderedItem {
            indent: line.chars().take_while(|c| c.is_whitespace()).count(),
            content: parse_inline(rest),
        }
    } else if let Some(marker) = ORDERED_MARKER.find(leading) {
        Block::OrderedItem {
            content: parse_inline(&leading[marker.end()..]),
        }
    } else if trimmed.is_empty() {
        return (None, start + 1);
    } else {
        Block::Paragraph {
            content: parse_inline(line),
        }
    };

    (Some(block), start + 1)
}

fn parse_heading(line: &str) -> Option<Block> {
    let (level, rest) = if let Some(rest) = line.strip_prefix("### ") {
        (3, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (2, rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        (1, rest)
    } else {
        return None;
    };

    Some(Block::Heading {
        level,
        content: parse_inline(rest),
    })
}

fn parse_code_block(lines: &[&str], start: usize) -> (Block, usize) {
    // Only the first word of the info string names the language; extra
    // backticks from a longer fence are not part of it.
    let language = lines[start].trim()[FENCE.len()..]
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches('`'))
        .filter(|word| !word.is_empty() && !word.contains('`'))
        .map(str::to_string);

    let mut i = start + 1;
    let mut code = Vec::new();
    while i < lines.len() && !lines[i].trim().starts_with(FENCE) {
        code.push(lines[i].to_string());
        i += 1;
    }

    if i < lines.len() {
        // Skip the closing fence
        i += 1;
    } else {
        debug!(line = start + 1, "unterminated code fence runs to end of document");
    }

    (
        Block::CodeBlock {
            language,
            lines: code,
        },
        i,
    )
}

fn parse_table(lines: &[&str], start: usize) -> (Block, usize) {
    let mut rows: Vec<Vec<Vec<Span>>> = Vec::new();
    let mut i = start;

    while i < lines.len() && lines[i].contains('|') {
        let row = lines[i].trim();
        i += 1;
        if SEPARATOR_ROW.is_match(row) {
            continue;
        }
        rows.push(split_cells(row));
    }

    let mut rows = rows.into_iter();
    let headers = rows.next().unwrap_or_default();
    (
        Block::Table {
            headers,
            rows: rows.collect(),
        },
        i,
    )
}

/// Split a trimmed table row into inline-parsed cells.
///
/// Only the empty cells produced by the outer pipes are dropped; empty
/// cells between two pipes are kept so columns stay aligned.
fn split_cells(row: &str) -> Vec<Vec<Span>> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split('|').map(|cell| parse_inline(cell.trim())).collect()
}

fn parse_blockquote(lines: &[&str], start: usize) -> (Block, usize) {
    let mut paragraphs = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let Some(text) = lines[i].trim_start().strip_prefix("> ") else {
            break;
        };
        paragraphs.push(parse_inline(text));
        i += 1;
    }

    (Block::Blockquote { paragraphs }, i)
}
