use std::path::Path;

use tracing::warn;

use super::NO_DOCUMENT;
use crate::doc_processor;
use crate::session::Session;

/// Load a PDF into the session, replacing the active document.
///
/// Opening a file with the same name as the active document keeps the
/// current session untouched. On failure the previous document stays active.
pub fn open_document(session: &mut Session, path: &Path) -> Result<String, String> {
    doc_processor::check_extension(path).map_err(|e| e.to_string())?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    if session.is_current(filename) {
        return Ok(format!(
            "{} is already loaded (matched by file name); the file was not read again.",
            filename
        ));
    }

    let document = doc_processor::parse_file(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "could not extract text");
        format!("Could not extract text from the PDF: {}", e)
    })?;

    let message = format!(
        "Loaded {} ({} pages, {} characters).",
        document.filename,
        document.page_count,
        document.char_count()
    );
    session.replace_document(document);
    Ok(message)
}

/// Short description of the active document and what has been derived from it.
pub fn document_status(session: &Session) -> String {
    match session.document() {
        Some(doc) => format!(
            "{}: {} pages, {} characters, analysis {}, {} chat turns",
            doc.filename,
            doc.page_count,
            doc.char_count(),
            if session.analysis().is_some() {
                "ready"
            } else {
                "not run"
            },
            session.history().len()
        ),
        None => NO_DOCUMENT.to_string(),
    }
}
