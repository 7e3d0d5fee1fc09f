use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, Span};
use crate::config::Config;

/// Convert blocks to an HTML fragment.
///
/// Consecutive list items of the same kind are grouped into one `<ul>` or
/// `<ol>`; everything else maps one block to one element.
pub fn blocks_to_html(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"");
    out.push_str(&encode_double_quoted_attribute(&config.html.class));
    out.push_str("\">\n");

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];
        if let Some(ordered) = block.list_ordering() {
            let run = blocks[i..]
                .iter()
                .take_while(|b| b.list_ordering() == Some(ordered))
                .count();
            emit_list(&blocks[i..i + run], ordered, config, &mut out);
            i += run;
        } else {
            emit_block(block, config, &mut out);
            i += 1;
        }
    }

    out.push_str("</div>\n");
    out
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            spans_to_html(content, config, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, config, out);
            out.push_str("</p>\n");
        }
        Block::CodeBlock { language, lines } => {
            out.push_str("<pre><code");
            if let Some(lang) = language {
                out.push_str(" class=\"language-");
                out.push_str(&encode_double_quoted_attribute(lang));
                out.push('"');
            }
            out.push('>');
            out.push_str(&encode_text(&lines.join("\n")));
            out.push_str("</code></pre>\n");
        }
        Block::Table { headers, rows } => {
            out.push_str("<table>\n<thead>\n<tr>");
            for cell in headers {
                out.push_str("<th>");
                spans_to_html(cell, config, out);
                out.push_str("</th>");
            }
            out.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str("<td>");
                    spans_to_html(cell, config, out);
                    out.push_str("</td>");
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        }
        Block::Blockquote { paragraphs } => {
            out.push_str("<blockquote>\n");
            for paragraph in paragraphs {
                out.push_str("<p>");
                spans_to_html(paragraph, config, out);
                out.push_str("</p>\n");
            }
            out.push_str("</blockquote>\n");
        }
        Block::Rule => out.push_str("<hr>\n"),
        Block::CheckboxItem { checked, content } => {
            let (class, marker) = if *checked {
                ("checkbox checked", "\u{2611}")
            } else {
                ("checkbox", "\u{2610}")
            };
            out.push_str(&format!("<div class=\"{class}\"><span>{marker}</span><span>"));
            spans_to_html(content, config, out);
            out.push_str("</span></div>\n");
        }
        Block::UnorderedItem { .. } => emit_list(std::slice::from_ref(block), false, config, out),
        Block::OrderedItem { .. } => emit_list(std::slice::from_ref(block), true, config, out),
    }
}

fn emit_list(items: &[Block], ordered: bool, config: &Config, out: &mut String) {
    let tag = if ordered { "ol" } else { "ul" };
    out.push_str(&format!("<{tag}>\n"));
    for item in items {
        match item {
            Block::UnorderedItem { indent, content } => {
                out.push_str(if *indent > 0 { "<li class=\"indented\">" } else { "<li>" });
                spans_to_html(content, config, out);
            }
            Block::OrderedItem { content } => {
                out.push_str("<li>");
                spans_to_html(content, config, out);
            }
            _ => continue,
        }
        out.push_str("</li>\n");
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn spans_to_html(spans: &[Span], config: &Config, out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(&encode_text(text)),
            Span::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&encode_text(text));
                out.push_str("</strong>");
            }
            Span::Italic(text) => {
                out.push_str("<em>");
                out.push_str(&encode_text(text));
                out.push_str("</em>");
            }
            Span::Code(text) => {
                out.push_str("<code>");
                out.push_str(&encode_text(text));
                out.push_str("</code>");
            }
            Span::Link { text, url } => {
                out.push_str("<a href=\"");
                out.push_str(&encode_double_quoted_attribute(url));
                out.push('"');
                if config.links.new_tab {
                    out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                }
                out.push('>');
                out.push_str(&encode_text(text));
                out.push_str("</a>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, markdown_to_html, markdown_to_html_with_config};

    const OPEN: &str = "<div class=\"lesson-notes\">\n";
    const CLOSE: &str = "</div>\n";

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            markdown_to_html("# Title\n\nSome **bold** text."),
            format!("{OPEN}<h1>Title</h1>\n<p>Some <strong>bold</strong> text.</p>\n{CLOSE}")
        );
    }

    #[test]
    fn escapes_text() {
        assert_eq!(
            markdown_to_html("a <script> & `<b>`"),
            format!("{OPEN}<p>a &lt;script&gt; &amp; <code>&lt;b&gt;</code></p>\n{CLOSE}")
        );
    }

    #[test]
    fn groups_list_runs() {
        assert_eq!(
            markdown_to_html("- one\n  - two\n1. first\n2. second\n- three"),
            format!(
                "{OPEN}<ul>\n<li>one</li>\n<li class=\"indented\">two</li>\n</ul>\n\
                 <ol>\n<li>first</li>\n<li>second</li>\n</ol>\n\
                 <ul>\n<li>three</li>\n</ul>\n{CLOSE}"
            )
        );
    }

    #[test]
    fn blank_line_does_not_split_list() {
        // Blank lines emit no block, so the items stay adjacent.
        assert_eq!(
            markdown_to_html("- one\n\n- two"),
            format!("{OPEN}<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n{CLOSE}")
        );
    }

    #[test]
    fn links_open_in_new_tab_by_default() {
        assert_eq!(
            markdown_to_html("[docs](https://example.com/?a=1&b=\"2\")"),
            format!(
                "{OPEN}<p><a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\" \
                 target=\"_blank\" rel=\"noopener noreferrer\">docs</a></p>\n{CLOSE}"
            )
        );
    }

    #[test]
    fn links_without_new_tab() {
        let mut config = Config::compiled_default();
        config.links.new_tab = false;
        config.html.class = "notes".to_string();
        assert_eq!(
            markdown_to_html_with_config("[a](b)", &config),
            "<div class=\"notes\">\n<p><a href=\"b\">a</a></p>\n</div>\n"
        );
    }

    #[test]
    fn code_block_with_language() {
        assert_eq!(
            markdown_to_html("```sh\nrm -rf <dir>\n```"),
            format!(
                "{OPEN}<pre><code class=\"language-sh\">rm -rf &lt;dir&gt;</code></pre>\n{CLOSE}"
            )
        );
    }

    #[test]
    fn table_blockquote_rule_checkbox() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |\n> quote\n---\n- [x] done\n- [ ] todo";
        assert_eq!(
            markdown_to_html(md),
            format!(
                "{OPEN}<table>\n<thead>\n<tr><th>A</th><th>B</th></tr>\n</thead>\n\
                 <tbody>\n<tr><td>1</td><td>2</td></tr>\n</tbody>\n</table>\n\
                 <blockquote>\n<p>quote</p>\n</blockquote>\n\
                 <hr>\n\
                 <div class=\"checkbox checked\"><span>\u{2611}</span><span>done</span></div>\n\
                 <div class=\"checkbox\"><span>\u{2610}</span><span>todo</span></div>\n{CLOSE}"
            )
        );
    }
}
