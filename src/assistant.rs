//! Report assistant: turns document text into a structured analysis and
//! answers free-form questions grounded in that text.
//!
//! Both operations are stateless. Only a fixed prefix of the document is sent
//! to the model; longer documents are cut silently.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError, ResponseFormat};
use crate::session::models::AnalysisResult;

/// Characters of document text sent with an analysis request.
pub const ANALYZE_CHAR_LIMIT: usize = 15_000;
/// Characters of document text sent with a question.
pub const ANSWER_CHAR_LIMIT: usize = 20_000;
pub const KEYWORD_COUNT: usize = 5;

pub const NOT_CONFIGURED: &str =
    "API key is not configured. Set GROQ_API_KEY in the environment, a .env file, or secrets.toml.";
/// Sentence the model is told to use when the report has nothing relevant.
pub const NOT_COVERED: &str = "This is not covered in the report.";

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("{}", NOT_CONFIGURED)]
    NotConfigured,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Model returned malformed JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Model response does not match the analysis schema: {0}")]
    Schema(String),
}

pub struct ReportAssistant {
    model: Option<Arc<dyn ChatModel>>,
    model_name: String,
}

impl ReportAssistant {
    pub fn new(model: Option<Arc<dyn ChatModel>>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    fn model(&self) -> Result<&Arc<dyn ChatModel>, AssistantError> {
        self.model.as_ref().ok_or(AssistantError::NotConfigured)
    }

    /// Ask for a one-sentence summary and five keywords.
    ///
    /// All-or-nothing: any transport failure, JSON error or schema violation
    /// yields an error and no partial result.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AssistantError> {
        let model = self.model()?;
        let excerpt = truncate_chars(text, ANALYZE_CHAR_LIMIT);
        info!(chars = excerpt.chars().count(), "requesting report analysis");

        let request = ChatRequest {
            messages: vec![ChatMessage::user(analyze_prompt(excerpt))],
            model: self.model_name.clone(),
            response_format: Some(ResponseFormat::JsonObject),
        };
        let response = model.chat(&request).await.inspect_err(|e| {
            warn!(error = %e, "analysis request failed");
        })?;
        debug!(model = %response.model, "analysis response received");

        parse_analysis(&response.content)
    }

    /// Answer `question` from the document text alone; prior chat turns are
    /// not sent. The model's reply is returned verbatim.
    pub async fn answer(&self, question: &str, text: &str) -> Result<String, AssistantError> {
        let model = self.model()?;
        let excerpt = truncate_chars(text, ANSWER_CHAR_LIMIT);
        info!(chars = excerpt.chars().count(), "answering question");

        let request = ChatRequest {
            messages: vec![ChatMessage::user(answer_prompt(question, excerpt))],
            model: self.model_name.clone(),
            response_format: None,
        };
        let response = model.chat(&request).await.inspect_err(|e| {
            warn!(error = %e, "question request failed");
        })?;
        debug!(model = %response.model, "answer received");

        Ok(response.content)
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn analyze_prompt(text: &str) -> String {
    format!(
        r#"You are an expert report analyst. Read the [Full report text] below and do the following:
1. Summarize the core topic and purpose of this report in one sentence.
2. Extract exactly {KEYWORD_COUNT} key keywords that represent the whole content.
3. Be ready to give the user insight into the report's overall tone and conclusions.

[Full report text]
{text}

Respond with a JSON object in exactly this shape:
{{
    "summary": "one-sentence summary",
    "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]
}}"#
    )
}

fn answer_prompt(question: &str, text: &str) -> String {
    format!(
        r#"The user asked the following question: {question}
Using the full report below, write the most accurate and trustworthy answer you can.
Follow these rules:
1. Only include content that is supported by the report.
2. If the report contains nothing relevant, say exactly: "{NOT_COVERED}"
3. Where possible, mention the section or page of the report the answer comes from.

[Full report text]
{text}"#
    )
}

/// Strip a surrounding Markdown code fence, if the model added one.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn parse_analysis(raw: &str) -> Result<AnalysisResult, AssistantError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let obj = value
        .as_object()
        .ok_or_else(|| AssistantError::Schema("expected a JSON object".into()))?;

    let summary = match obj.get("summary") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => return Err(AssistantError::Schema("`summary` is empty".into())),
        Some(_) => return Err(AssistantError::Schema("`summary` is not a string".into())),
        None => return Err(AssistantError::Schema("missing `summary`".into())),
    };

    let items = match obj.get("keywords") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(AssistantError::Schema("`keywords` is not an array".into())),
        None => return Err(AssistantError::Schema("missing `keywords`".into())),
    };
    if items.len() != KEYWORD_COUNT {
        return Err(AssistantError::Schema(format!(
            "expected {KEYWORD_COUNT} keywords, got {}",
            items.len()
        )));
    }
    let keywords = items
        .iter()
        .map(|item| match item.as_str().map(str::trim) {
            Some(k) if !k.is_empty() => Ok(k.to_string()),
            _ => Err(AssistantError::Schema(
                "every keyword must be a non-empty string".into(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisResult { summary, keywords })
}
