//! Configuration management for the OpenAI client
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API base URL
    pub api_url: String,
    /// OpenAI API key
    pub api_key: String,
    /// Organization sent as `OpenAI-Organization`
    pub organization: Option<String>,

    /// Request timeout (in seconds)
    pub timeout_seconds: u64,

    /// Version sent in the `OpenAI-Beta: assistants=...` header
    pub assistants_beta: String,

    /// Model used by the command-line client
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            organization: env::var("OPENAI_ORGANIZATION").ok(),

            timeout_seconds: env::var("OPENAI_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("Invalid OPENAI_TIMEOUT_SECONDS")?,

            assistants_beta: env::var("OPENAI_ASSISTANTS_BETA")
                .unwrap_or_else(|_| "v1".to_string()),

            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }

    /// Configuration pointing at `api_url` with defaults for everything else
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            organization: None,
            timeout_seconds: 300,
            assistants_beta: "v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
