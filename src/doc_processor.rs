use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::session::models::Document;

/// Text pulled out of one PDF, pages joined with newlines
pub struct ParsedDocument {
    pub content: String,
    pub page_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(String),
    #[error("No extractable text in PDF (scanned or image-only pages are not supported)")]
    NoText,
    #[error("Unsupported file type: .{0}")]
    Unsupported(String),
}

/// Only `.pdf` is accepted, case-insensitively.
pub fn check_extension(path: &Path) -> Result<(), ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf" => Ok(()),
        _ => Err(ExtractError::Unsupported(ext)),
    }
}

/// Extract the text layer of an in-memory PDF.
///
/// Every page with text contributes its text followed by a newline. Pages
/// without a text layer are skipped; if none has one the result is
/// [`ExtractError::NoText`]. No OCR is attempted.
///
/// `pdf-extract` panics on some files that load cleanly (a content stream
/// naming a font the page never declares, for one); those become
/// [`ExtractError::Parse`] as well.
pub fn extract_text(bytes: &[u8]) -> Result<ParsedDocument, ExtractError> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| {
        warn!("PDF parser panicked on malformed input");
        ExtractError::Parse("PDF parser failed on malformed input".into())
    })?
    .map_err(|e| ExtractError::Parse(e.to_string()))?;
    let page_count = pages.len();

    let mut content = String::new();
    for page in pages.iter().filter(|p| !p.trim().is_empty()) {
        content.push_str(page);
        content.push('\n');
    }

    if content.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    debug!(page_count, chars = content.chars().count(), "extracted PDF text");
    Ok(ParsedDocument {
        content,
        page_count,
    })
}

/// Read a PDF from disk and turn it into a session [`Document`]
pub fn parse_file(path: &Path) -> Result<Document, ExtractError> {
    check_extension(path)?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let bytes = fs::read(path)?;
    let parsed = extract_text(&bytes)?;

    Ok(Document::new(filename, parsed.content, parsed.page_count))
}
