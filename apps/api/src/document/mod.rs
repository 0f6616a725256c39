//! Document extraction: turns an uploaded file into plain text plus the
//! hyperlink records embedded in it.
//!
//! The parser never sees bytes: it works from `ExtractedDocument` only, so any
//! `DocumentExtractor` can stand in front of it.

pub mod page_text;
pub mod pdf;
pub mod scratch;
pub mod upload;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use page_text::Rect;
pub use pdf::PdfExtractor;
pub use scratch::ScratchFile;

/// A link annotation found in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub uri: String,
    /// Visible or annotated text for the link; empty when unknown.
    pub text: String,
    /// Zero-based page index.
    pub page: u32,
    /// Clickable area in PDF user space, when the annotation declares one.
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub hyperlinks: Vec<Hyperlink>,
}

impl ExtractedDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hyperlinks: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode PDF: {0}")]
    Pdf(String),

    #[error("document is not valid UTF-8 text")]
    Encoding,
}

/// Decodes a stored document into text and hyperlinks.
///
/// Implementations are synchronous and may be CPU-heavy; callers run them on
/// the blocking pool.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentError>;
}

/// Plain-text and Markdown uploads. These carry no hyperlink records.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, DocumentError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| DocumentError::Encoding)?;
        Ok(ExtractedDocument::from_text(text))
    }
}

/// Picks an extractor from the uploaded file name. Anything that is not
/// recognisably text is handed to the PDF decoder.
pub fn extractor_for(file_name: &str) -> &'static dyn DocumentExtractor {
    match extension_of(file_name).as_deref() {
        Some("txt") | Some("md") | Some("markdown") => &PlainTextExtractor,
        _ => &PdfExtractor,
    }
}

pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
