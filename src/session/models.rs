use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Plain text of one uploaded PDF.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub content: String,
    pub page_count: usize,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<String>, page_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            content: content.into(),
            page_count,
        }
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// One-sentence summary plus exactly five keywords.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}
