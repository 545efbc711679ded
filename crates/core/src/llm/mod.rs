//! # Completion Clients
//!
//! The AI capability boundary. The lookup service only sees
//! [`CompletionClient`]; concrete clients speak each provider's HTTP API.

pub mod gemini;
pub mod openai;

use crate::error::CompletionError;
use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

/// Sends one user-role prompt and returns the raw text of the reply
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
