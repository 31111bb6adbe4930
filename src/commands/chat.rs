use tracing::warn;

use super::require_document;
use crate::assistant::{AssistantError, ReportAssistant};
use crate::session::models::{ChatTurn, Role};
use crate::session::Session;

/// Ask a question about the active document.
///
/// The question and the reply are both appended to the chat history. A failed
/// model call still produces an assistant turn carrying the error text, so the
/// transcript shows what happened.
pub async fn send_message(
    session: &mut Session,
    assistant: &ReportAssistant,
    content: &str,
) -> Result<ChatTurn, String> {
    let question = content.trim();
    if question.is_empty() {
        return Err("Question is empty.".to_string());
    }
    require_document(session)?;

    // 1. Save user message
    session.push_turn(Role::User, question);

    // 2. Answer from the document text only
    let result = {
        let document = require_document(session)?;
        assistant.answer(question, &document.content).await
    };
    let reply = match result {
        Ok(reply) => reply,
        Err(AssistantError::NotConfigured) => AssistantError::NotConfigured.to_string(),
        Err(e) => {
            warn!(error = %e, "question failed");
            format!("Error responding to question: {}", e)
        }
    };

    // 3. Save assistant message
    session.push_turn(Role::Assistant, reply.clone());
    Ok(ChatTurn {
        role: Role::Assistant,
        content: reply,
    })
}

pub fn render_turn(turn: &ChatTurn) -> String {
    let prefix = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{}> {}", prefix, turn.content)
}

pub fn render_history(session: &Session) -> String {
    if session.history().is_empty() {
        return "No questions asked yet.".to_string();
    }
    session
        .history()
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n")
}
