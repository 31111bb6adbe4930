//! Runtime settings.
//!
//! Precedence: command-line flag, then environment (including `.env`), then
//! the secrets file, then built-in defaults. Only the API key is required;
//! without it the assistant runs in "not configured" mode.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;
use tracing::debug;

use crate::assistant::ReportAssistant;
use crate::llm::openai::{OpenAiClient, OpenAiConfig};
use crate::llm::{ChatModel, LlmError};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// API key for the chat-completion endpoint
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "LLM_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Model name sent with every request
    #[arg(long, env = "LLM_MODEL", global = true)]
    pub model: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long = "timeout", env = "LLM_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// TOML file holding deployment secrets
    #[arg(long, env = "REPORT_ASSISTANT_SECRETS", default_value = DEFAULT_SECRETS_PATH, global = true)]
    pub secrets: PathBuf,
}

/// Keys read from the secrets file; names match the environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    #[serde(rename = "GROQ_API_KEY")]
    pub api_key: Option<String>,
    #[serde(rename = "LLM_BASE_URL")]
    pub base_url: Option<String>,
    #[serde(rename = "LLM_MODEL")]
    pub model: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid secrets file {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A missing file is not an error.
pub fn load_secrets(path: &Path) -> Result<Option<SecretsFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let secrets = toml::from_str(&raw).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded secrets file");
    Ok(Some(secrets))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    pub fn resolve(args: &ConfigArgs, secrets: Option<SecretsFile>) -> Self {
        let secrets = secrets.unwrap_or_default();
        Self {
            api_key: non_blank(args.api_key.clone()).or_else(|| non_blank(secrets.api_key)),
            base_url: non_blank(args.base_url.clone())
                .or_else(|| non_blank(secrets.base_url))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_blank(args.model.clone())
                .or_else(|| non_blank(secrets.model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }

    /// API key for display: first and last four characters only.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|value| {
            let chars: Vec<char> = value.chars().collect();
            if chars.len() > 8 {
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}...{}", head, tail)
            } else {
                "****".to_string()
            }
        })
    }

    /// An assistant wired to the configured endpoint, or an unconfigured one
    /// when no key is set.
    pub fn build_assistant(&self) -> Result<ReportAssistant, LlmError> {
        let model = match &self.api_key {
            Some(api_key) => {
                let client = OpenAiClient::new(OpenAiConfig {
                    api_key: api_key.clone(),
                    base_url: self.base_url.clone(),
                    timeout: self.timeout,
                })?;
                Some(Arc::new(client) as Arc<dyn ChatModel>)
            }
            None => None,
        };
        Ok(ReportAssistant::new(model, self.model.clone()))
    }
}
