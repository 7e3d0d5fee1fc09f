mod block;
mod config;
mod error;
mod html;
mod inline;
mod parser;
mod typst;

pub use block::{Block, Span, plain_text};
pub use config::{Config, HtmlConfig, LayoutConfig, LinksConfig, PageConfig};
pub use error::{Error, Result};
pub use html::blocks_to_html;
pub use inline::parse_inline;
pub use typst::blocks_to_typst;

use tracing::debug;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse lesson Markdown into a flat, document-ordered list of blocks.
///
/// Total over all inputs: malformed markup degrades to paragraphs or plain
/// text, and the empty string yields no blocks.
pub fn render_document(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to an HTML fragment using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to an HTML fragment with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> String {
    let blocks = render_document(markdown);
    html::blocks_to_html(&blocks, config)
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = render_document(markdown);
    typst::blocks_to_typst(&blocks, config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    compile_pdf(markdown_to_typst_with_config(markdown, config))
}

/// Compile Typst source to PDF using only the embedded fonts.
fn compile_pdf(typst_content: String) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{:?}", e)))?;
    debug!(pages = doc.pages.len(), "compiled typst document");

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}
