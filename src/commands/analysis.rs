use tracing::warn;

use super::require_document;
use crate::assistant::ReportAssistant;
use crate::session::models::AnalysisResult;
use crate::session::Session;

/// Run Analyze on the active document and store the result.
///
/// A failed call leaves any earlier result in place; nothing partial is stored.
pub async fn analyze(
    session: &mut Session,
    assistant: &ReportAssistant,
) -> Result<AnalysisResult, String> {
    let result = {
        let document = require_document(session)?;
        assistant.analyze(&document.content).await
    };

    match result {
        Ok(result) => {
            session.set_analysis(result.clone());
            Ok(result)
        }
        Err(e) => {
            warn!(error = %e, "analysis failed");
            Err(e.to_string())
        }
    }
}

pub fn show_summary(session: &Session) -> Result<String, String> {
    session
        .analysis()
        .map(render_analysis)
        .ok_or_else(|| "No analysis yet. Run /analyze first.".to_string())
}

/// Summary panel: the sentence followed by `#keyword` tags.
pub fn render_analysis(result: &AnalysisResult) -> String {
    let tags: Vec<String> = result.keywords.iter().map(|k| format!("#{}", k)).collect();
    format!(
        "Summary:\n  {}\n\nKeywords:\n  {}",
        result.summary,
        tags.join("  ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::NO_DOCUMENT;
    use crate::llm::{ChatModel, LlmError};
    use crate::session::models::Document;
    use crate::testing::StubModel;
    use std::sync::Arc;

    fn result() -> AnalysisResult {
        AnalysisResult {
            summary: "Revenue rose.".into(),
            keywords: ["revenue", "growth", "risk", "supply", "quarter"]
                .map(String::from)
                .to_vec(),
        }
    }

    #[test]
    fn test_render_analysis() {
        let text = render_analysis(&result());
        assert_eq!(
            text,
            "Summary:\n  Revenue rose.\n\nKeywords:\n  #revenue  #growth  #risk  #supply  #quarter"
        );
    }

    #[test]
    fn test_show_summary_requires_analysis() {
        let mut session = Session::new();
        assert!(show_summary(&session).is_err());
        session.set_analysis(result());
        assert!(show_summary(&session).unwrap().contains("#supply"));
    }

    #[tokio::test]
    async fn test_analyze_without_document() {
        let stub = StubModel::replying(["{}"]);
        let assistant = ReportAssistant::new(Some(stub.clone() as Arc<dyn ChatModel>), "m");
        let mut session = Session::new();

        let err = analyze(&mut session, &assistant).await.unwrap_err();
        assert_eq!(err, NO_DOCUMENT);
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_analysis_keeps_previous_result() {
        let stub = StubModel::failing(LlmError::Parse("bad".into()));
        let assistant = ReportAssistant::new(Some(stub as Arc<dyn ChatModel>), "m");
        let mut session = Session::new();
        session.replace_document(Document::new("a.pdf", "text", 1));
        session.set_analysis(result());

        let err = analyze(&mut session, &assistant).await.unwrap_err();
        assert!(err.contains("bad"));
        assert_eq!(session.analysis(), Some(&result()));
    }
}
