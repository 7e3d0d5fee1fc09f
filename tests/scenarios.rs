//! End-to-end parsing scenarios over realistic lesson notes.

use lessonmd::{Block, Span, render_document};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn text(s: &str) -> Vec<Span> {
    vec![Span::Text(s.to_string())]
}

#[rstest]
#[case(
    "# Title\n\nSome **bold** text.",
    vec![
        Block::Heading { level: 1, content: text("Title") },
        Block::Paragraph {
            content: vec![
                Span::Text("Some ".to_string()),
                Span::Bold("bold".to_string()),
                Span::Text(" text.".to_string()),
            ],
        },
    ]
)]
#[case(
    "| A | B |\n| --- | --- |\n| 1 | 2 |",
    vec![Block::Table {
        headers: vec![text("A"), text("B")],
        rows: vec![vec![text("1"), text("2")]],
    }]
)]
#[case(
    "- Item one\n- Item two",
    vec![
        Block::UnorderedItem { indent: 0, content: text("Item one") },
        Block::UnorderedItem { indent: 0, content: text("Item two") },
    ]
)]
#[case(
    "```\n**not bold**\n```",
    vec![Block::CodeBlock { language: None, lines: vec!["**not bold**".to_string()] }]
)]
#[case("### Title", vec![Block::Heading { level: 3, content: text("Title") }])]
#[case("## Title", vec![Block::Heading { level: 2, content: text("Title") }])]
#[case("- [x] Done", vec![Block::CheckboxItem { checked: true, content: text("Done") }])]
#[case("- [ ] Todo", vec![Block::CheckboxItem { checked: false, content: text("Todo") }])]
#[case("", vec![])]
fn documents(#[case] markdown: &str, #[case] expected: Vec<Block>) {
    assert_eq!(render_document(markdown), expected);
}

#[test]
fn lesson_notes() {
    let notes = "\
# Anatomy of a Phishing Email

Phishing emails are designed to **trick you** into giving away personal information.

## The 5 Key Parts

- **From Address** looks like `support@paypa1.com`.
- **Subject Line** creates panic: *\"Your account will be suspended!\"*

> **Subject:** Urgent, verify your student email NOW
> **From:** admin@university-verify.net

This is phishing because:
1. The domain is **not** your university's.
2. The deadline creates **artificial urgency**.

---
*Tip: Hover over any link before clicking.*";

    let blocks = render_document(notes);
    let kinds: Vec<&str> = blocks
        .iter()
        .map(|block| match block {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::CodeBlock { .. } => "code",
            Block::Table { .. } => "table",
            Block::Blockquote { .. } => "quote",
            Block::Rule => "rule",
            Block::CheckboxItem { .. } => "checkbox",
            Block::UnorderedItem { .. } => "ul",
            Block::OrderedItem { .. } => "ol",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "heading", "paragraph", "heading", "ul", "ul", "quote", "paragraph", "ol", "ol",
            "rule", "paragraph",
        ]
    );

    assert_eq!(
        blocks[3],
        Block::UnorderedItem {
            indent: 0,
            content: vec![
                Span::Bold("From Address".to_string()),
                Span::Text(" looks like ".to_string()),
                Span::Code("support@paypa1.com".to_string()),
                Span::Text(".".to_string()),
            ],
        }
    );
    assert_eq!(
        blocks[10],
        Block::Paragraph {
            content: vec![Span::Italic("Tip: Hover over any link before clicking.".to_string())],
        }
    );
    match &blocks[5] {
        Block::Blockquote { paragraphs } => assert_eq!(paragraphs.len(), 2),
        other => panic!("expected blockquote, got {other:?}"),
    }
}

#[test]
fn json_dump_is_tagged() {
    let blocks = render_document("## Tips\n- [x] Use **MFA**");
    let json = serde_json::to_value(&blocks).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "heading", "level": 2, "content": [{"text": "Tips"}]},
            {"type": "checkbox_item", "checked": true, "content": [{"text": "Use "}, {"bold": "MFA"}]},
        ])
    );
}
