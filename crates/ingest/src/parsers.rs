//! Format-specific text extraction.
//!
//! The parser is a trait seam so the staging queue can be driven by a
//! scripted parser in tests. [`DefaultParsers`] is the production
//! implementation: UTF-8 decode for text, per-page extraction for PDF
//! (capped page count), and `word/document.xml` text runs for `.docx`.

use async_trait::async_trait;
use pblforge_core::error::ParseError;
use regex::Regex;
use std::io::Read;
use tracing::debug;

use crate::format::DocumentFormat;

/// A raw uploaded file: the source handle for one staged entry.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared MIME type, when the uploader provided one.
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime: Option<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            data,
        }
    }
}

/// Extracts plain text from one uploaded file.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, file: &UploadedFile) -> std::result::Result<String, ParseError>;
}

/// The production parser set, dispatching on [`DocumentFormat`].
pub struct DefaultParsers {
    max_pdf_pages: u32,
}

impl DefaultParsers {
    pub fn new() -> Self {
        Self { max_pdf_pages: 30 }
    }

    /// Override the PDF page cap (pages beyond it are silently omitted).
    pub fn with_max_pdf_pages(mut self, max_pdf_pages: u32) -> Self {
        self.max_pdf_pages = max_pdf_pages;
        self
    }

    fn parse_text(data: &[u8]) -> std::result::Result<String, ParseError> {
        String::from_utf8(data.to_vec()).map_err(|e| ParseError::Encoding(e.to_string()))
    }

    fn parse_pdf(&self, data: &[u8]) -> std::result::Result<String, ParseError> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| ParseError::Pdf(format!("could not open document: {e}")))?;

        // Page numbers come back ordered; extraction stops at the cap.
        let page_numbers: Vec<u32> = doc
            .get_pages()
            .keys()
            .copied()
            .take(self.max_pdf_pages as usize)
            .collect();

        let mut pages = Vec::with_capacity(page_numbers.len());
        for page in page_numbers {
            let text = doc
                .extract_text(&[page])
                .map_err(|e| ParseError::Pdf(format!("page {page}: {e}")))?;
            pages.push(text);
        }
        Ok(pages.join("\n"))
    }

    fn parse_docx(data: &[u8]) -> std::result::Result<String, ParseError> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| ParseError::Word(format!("not a valid .docx container: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| ParseError::Word(format!("missing word/document.xml: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| ParseError::Word(format!("could not read document body: {e}")))?;

        Ok(extract_docx_text(&xml))
    }
}

impl Default for DefaultParsers {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentParser for DefaultParsers {
    async fn parse(&self, file: &UploadedFile) -> std::result::Result<String, ParseError> {
        let format = DocumentFormat::detect(file.mime.as_deref(), &file.name);
        debug!(file = %file.name, %format, bytes = file.data.len(), "parsing upload");
        match format {
            DocumentFormat::PlainText => Self::parse_text(&file.data),
            DocumentFormat::Pdf => self.parse_pdf(&file.data),
            DocumentFormat::Word => Self::parse_docx(&file.data),
        }
    }
}

/// Pull the visible text runs out of a `word/document.xml` body:
/// `<w:t>` runs concatenated per paragraph, paragraphs joined with
/// newlines.
fn extract_docx_text(xml: &str) -> String {
    let run = Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").expect("static regex");

    let mut lines = Vec::new();
    for paragraph in xml.split("</w:p>") {
        let text: String = run
            .captures_iter(paragraph)
            .map(|c| unescape_xml(&c[1]))
            .collect();
        if !text.trim().is_empty() {
            lines.push(text);
        }
    }
    lines.join("\n")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
