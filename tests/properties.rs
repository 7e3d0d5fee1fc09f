//! Property-based tests for the lesson Markdown parser
//!
//! The parser is total, so arbitrary input must never panic, and inline
//! parsing must only ever remove markup delimiters, never content.

use lessonmd::{Block, Span, parse_inline, plain_text, render_document};
use proptest::prelude::*;

/// Text that contains no inline delimiter characters
fn plain_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:!?'-]{1,12}"
}

/// One inline fragment as (markdown source, visible text, is_markup)
fn fragment_strategy() -> impl Strategy<Value = (String, String, bool)> {
    prop_oneof![
        plain_strategy().prop_map(|t| (t.clone(), t, false)),
        plain_strategy().prop_map(|t| (format!("**{t}**"), t, true)),
        plain_strategy().prop_map(|t| (format!("*{t}*"), t, true)),
        plain_strategy().prop_map(|t| (format!("`{t}`"), t, true)),
        (plain_strategy(), "[a-z]{1,8}").prop_map(|(t, host)| {
            (format!("[{t}](https://{host}.example)"), t, true)
        }),
    ]
}

proptest! {
    #[test]
    fn render_never_panics(input in any::<String>()) {
        let _ = render_document(&input);
    }

    #[test]
    fn render_never_panics_on_markdownish_input(
        input in "([#>|`*\\-\\[\\]() 0-9.x\n]|[a-z]){0,80}"
    ) {
        let _ = render_document(&input);
    }

    #[test]
    fn text_without_delimiters_is_one_span(text in "[^*`\\[]{0,40}") {
        prop_assert_eq!(parse_inline(&text), vec![Span::Text(text.clone())]);
    }

    #[test]
    fn spans_reproduce_stripped_text(
        fragments in prop::collection::vec(fragment_strategy(), 1..8)
    ) {
        let source: String = fragments.iter().map(|(md, _, _)| md.as_str()).collect();
        let visible: String = fragments.iter().map(|(_, text, _)| text.as_str()).collect();
        let markup_count = fragments.iter().filter(|(_, _, markup)| *markup).count();

        let spans = parse_inline(&source);
        prop_assert_eq!(plain_text(&spans), visible);
        prop_assert_eq!(
            spans.iter().filter(|span| !matches!(span, Span::Text(_))).count(),
            markup_count
        );
    }

    #[test]
    fn separator_rows_never_emitted(
        header in "[a-z]{1,6}",
        cell in "[a-z]{1,6}",
        dashes in "[-:]{1,5}",
    ) {
        let markdown = format!("| {header} | x |\n| {dashes} | {dashes} |\n| {cell} | y |");
        let blocks = render_document(&markdown);
        let expected = vec![Block::Table {
            headers: vec![
                vec![Span::Text(header.clone())],
                vec![Span::Text("x".to_string())],
            ],
            rows: vec![vec![
                vec![Span::Text(cell.clone())],
                vec![Span::Text("y".to_string())],
            ]],
        }];
        prop_assert_eq!(blocks, expected);
    }

    #[test]
    fn code_lines_are_verbatim(lines in prop::collection::vec("[^`\n\r]{0,20}", 0..6)) {
        let markdown = format!("```\n{}\n```", lines.join("\n"));
        let expected = if lines.is_empty() { vec![String::new()] } else { lines.clone() };
        prop_assert_eq!(
            render_document(&markdown),
            vec![Block::CodeBlock { language: None, lines: expected }]
        );
    }
}
