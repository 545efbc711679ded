//! # Techlookup Models
//!
//! Completion provider configuration. A [`ModelConfig`] is resolved once at
//! startup and turned into a shared [`CompletionClient`] with
//! [`ModelConfig::create_client`].

use crate::error::CompletionError;
use crate::llm::{CompletionClient, GeminiClient, OpenAiClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Supported completion providers
///
/// - Gemini (Google) - `GEMINI_API_KEY`
/// - OpenAI or any OpenAI-compatible gateway - `OPENAI_API_KEY`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAI,
}

impl LlmProvider {
    /// Parse the value of `TECHLOOKUP_PROVIDER`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(LlmProvider::Gemini),
            "openai" => Some(LlmProvider::OpenAI),
            _ => None,
        }
    }

    /// Display name for logs and the UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "Gemini",
            LlmProvider::OpenAI => "OpenAI",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash",
            LlmProvider::OpenAI => "gpt-4o-mini",
        }
    }
}

/// Configuration for the completion client
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g., "gemini-2.5-flash", "gpt-4o-mini")
    pub model: String,
    /// Optional API root override (proxies, OpenAI-compatible servers)
    pub base_url: Option<String>,
    /// Request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
    #[serde(skip)]
    pub api_key: String,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &"***")
            .finish()
    }
}

impl ModelConfig {
    /// Config for a provider with its default model
    pub fn new(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            base_url: None,
            timeout_secs: None,
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the provider's API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the HTTP client for the configured provider
    pub fn create_client(&self) -> Result<Arc<dyn CompletionClient>, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let client: Arc<dyn CompletionClient> = match self.provider {
            LlmProvider::Gemini => {
                let mut client = GeminiClient::new(http, &self.model, &self.api_key);
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url);
                }
                Arc::new(client)
            }
            LlmProvider::OpenAI => {
                let mut client = OpenAiClient::new(http, &self.model, &self.api_key);
                if let Some(base_url) = &self.base_url {
                    client = client.with_base_url(base_url);
                }
                Arc::new(client)
            }
        };
        Ok(client)
    }
}
