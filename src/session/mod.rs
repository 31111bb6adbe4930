pub mod models;

use models::{AnalysisResult, ChatTurn, Document, Role};
use tracing::info;

/// Everything one interactive user has loaded and produced.
///
/// The analysis and the chat history only make sense for the document that
/// produced them, so [`Session::replace_document`] always drops both.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
    analysis: Option<AnalysisResult>,
    history: Vec<ChatTurn>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Document ──

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// True when `filename` is already the active document.
    pub fn is_current(&self, filename: &str) -> bool {
        self.document
            .as_ref()
            .is_some_and(|d| d.filename == filename)
    }

    pub fn replace_document(&mut self, document: Document) {
        self.invalidate();
        info!(
            document_id = %document.id,
            filename = %document.filename,
            pages = document.page_count,
            chars = document.char_count(),
            "document loaded"
        );
        self.document = Some(document);
    }

    /// Forget everything derived from the current document.
    pub fn invalidate(&mut self) {
        self.analysis = None;
        self.history.clear();
    }

    // ── Analysis ──

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn set_analysis(&mut self, result: AnalysisResult) {
        self.analysis = Some(result);
    }

    // ── Chat ──

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn push_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatTurn {
            role,
            content: content.into(),
        });
    }
}
