use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::block::Span;

/// Combined inline pattern. Alternatives are tried in order at each position,
/// so `**bold**` wins over `*italic*` when both start at the same byte.
static INLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>.+?)\*|`(?P<code>[^`]+?)`|\[(?P<text>[^\]]+)\]\((?P<url>[^)]+)\)",
    )
    .unwrap()
});

/// Parse a line of text into a flat sequence of spans.
///
/// Unterminated delimiters are left as literal text. The result is never
/// empty: text without markup comes back as a single [`Span::Text`].
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Text(text[last..whole.start()].to_string()));
        }
        spans.push(span_from_captures(&caps));
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }

    if spans.is_empty() {
        spans.push(Span::Text(text.to_string()));
    }
    spans
}

fn span_from_captures(caps: &Captures<'_>) -> Span {
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    if let Some(text) = group("bold") {
        Span::Bold(text)
    } else if let Some(text) = group("italic") {
        Span::Italic(text)
    } else if let Some(text) = group("code") {
        Span::Code(text)
    } else {
        Span::Link {
            text: group("text").unwrap_or_default(),
            url: group("url").unwrap_or_default(),
        }
    }
}
