//! Interface-layer handlers. Each takes the session (and assistant where a
//! model call is involved) and returns text ready to show, or a user-facing
//! error string.

pub mod analysis;
pub mod chat;
pub mod document;
pub mod settings;

use crate::session::models::Document;
use crate::session::Session;

pub(crate) const NO_DOCUMENT: &str = "No document loaded. Use /open <file.pdf> first.";

fn require_document(session: &Session) -> Result<&Document, String> {
    session.document().ok_or_else(|| NO_DOCUMENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{ReportAssistant, NOT_CONFIGURED};
    use crate::llm::ChatModel;
    use crate::session::models::Role;
    use crate::testing::{sample_pdf, StubModel};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_upload_analyze_and_ask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q3.pdf");
        std::fs::write(
            &path,
            sample_pdf(&["Quarterly revenue rose 12%. Risks include supply delays."]),
        )
        .unwrap();

        let stub = StubModel::replying([
            r#"{"summary":"Quarterly revenue grew 12% despite supply risks.","keywords":["revenue","growth","quarterly results","risks","supply delays"]}"#,
            "The report names supply delays as the main risk.",
        ]);
        let assistant = ReportAssistant::new(Some(stub.clone() as Arc<dyn ChatModel>), "m");
        let mut session = Session::new();

        document::open_document(&mut session, &path).unwrap();
        assert!(session.document().unwrap().content.contains("revenue"));

        let result = analysis::analyze(&mut session, &assistant).await.unwrap();
        assert!(result.summary.contains("revenue"));
        assert_eq!(result.keywords.len(), 5);
        assert_eq!(session.analysis(), Some(&result));

        let turn = chat::send_message(&mut session, &assistant, "What are the risks?")
            .await
            .unwrap();
        assert_eq!(turn.role, Role::Assistant);
        assert!(turn.content.contains("supply delays"));
        assert_eq!(session.history().len(), 2);

        // The document text reached the model on both calls.
        for request in stub.requests() {
            assert!(request.messages[0].content.contains("revenue"));
        }
    }

    #[tokio::test]
    async fn test_new_upload_discards_old_state() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.pdf");
        let second = dir.path().join("second.pdf");
        std::fs::write(&first, sample_pdf(&["First report"])).unwrap();
        std::fs::write(&second, sample_pdf(&["Second report"])).unwrap();

        let stub = StubModel::replying([
            r#"{"summary":"First.","keywords":["a","b","c","d","e"]}"#,
            "answer",
        ]);
        let assistant = ReportAssistant::new(Some(stub as Arc<dyn ChatModel>), "m");
        let mut session = Session::new();

        document::open_document(&mut session, &first).unwrap();
        analysis::analyze(&mut session, &assistant).await.unwrap();
        chat::send_message(&mut session, &assistant, "q").await.unwrap();

        document::open_document(&mut session, &second).unwrap();
        assert!(session.analysis().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.document().unwrap().filename, "second.pdf");
    }

    #[tokio::test]
    async fn test_unconfigured_flow() {
        let assistant = ReportAssistant::new(None, "m");
        let mut session = Session::new();
        session.replace_document(Document::new("a.pdf", "text", 1));

        let err = analysis::analyze(&mut session, &assistant).await.unwrap_err();
        assert_eq!(err, NOT_CONFIGURED);
        assert!(session.analysis().is_none());

        let turn = chat::send_message(&mut session, &assistant, "q").await.unwrap();
        assert_eq!(turn.content, NOT_CONFIGURED);
    }
}
