/*!
 * PDF text extraction.
 *
 * Documents are validated up front (signature and size), then split into
 * per-page text. Extraction sits behind the `TextExtractor` trait so review
 * sessions can run against canned pages in tests.
 */

use log::{debug, warn};
use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::errors::DocumentError;

/// Largest accepted upload, in bytes
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Leading bytes of every PDF file
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Separator between pages in the flattened document text
const PAGE_JOIN: &str = "\n\n";

/// Text of a single physical page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    /// 1-based page number
    pub page_number: u32,
    /// Extracted text
    pub content: String,
}

impl PageText {
    /// Create a page
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }
}

/// Result of extracting a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// All page texts joined by blank lines
    pub text: String,
    /// Pages in physical order
    pub pages: Vec<PageText>,
    /// Number of pages in the file
    pub total_pages: usize,
}

impl ParsedDocument {
    /// Assemble a document from its pages
    pub fn from_pages(pages: Vec<PageText>) -> Self {
        let text = pages
            .iter()
            .map(|p| p.content.trim())
            .collect::<Vec<_>>()
            .join(PAGE_JOIN)
            .trim()
            .to_string();

        Self {
            text,
            total_pages: pages.len(),
            pages,
        }
    }

    /// Whether no page produced any text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Something that can turn document bytes into page text
pub trait TextExtractor: Send + Sync {
    /// Extract every page of the document
    fn extract(&self, bytes: &[u8]) -> Result<ParsedDocument, DocumentError>;
}

/// Check the signature and size of an uploaded file
pub fn validate_pdf(bytes: &[u8]) -> Result<(), DocumentError> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(DocumentError::TooLarge {
            size: bytes.len(),
            limit: MAX_FILE_SIZE,
        });
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(DocumentError::NotPdf);
    }
    Ok(())
}

/// `TextExtractor` backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ParsedDocument, DocumentError> {
        validate_pdf(bytes)?;

        let doc = Document::load_mem(bytes)
            .map_err(|e| DocumentError::Unreadable(e.to_string()))?;

        let mut pages = Vec::new();
        for (page_num, _page_id) in doc.get_pages() {
            // One bad page should not sink the rest of the document.
            let content = match doc.extract_text(&[page_num]) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!("Could not extract text from page {}: {}", page_num, e);
                    String::new()
                }
            };
            pages.push(PageText::new(page_num, content));
        }

        let parsed = ParsedDocument::from_pages(pages);
        debug!(
            "Extracted {} characters from {} pages",
            parsed.text.chars().count(),
            parsed.total_pages
        );

        if parsed.is_blank() {
            return Err(DocumentError::NoText);
        }
        Ok(parsed)
    }
}
