//! # Errors
//!
//! Error taxonomy shared by the catalog, completion clients and lookup service.
//! An empty search term is not an error: it is reported as
//! [`LookupOutcome::EmptyTerm`](crate::lookup::LookupOutcome::EmptyTerm).

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the catalog document
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("catalog {path:?} is not a JSON array of records: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode catalog: {0}")]
    Encode(serde_json::Error),
}

/// Failures talking to the completion service
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion API response contained no text")]
    EmptyResponse,
}

/// Ways an AI answer can fail the accepted-shape check
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("answer is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("answer is not a JSON object")]
    NotAnObject,

    #[error("answer has neither an \"error\" key nor a non-empty \"name\"")]
    MissingName,

    #[error("field \"{field}\" must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Terminal failures of a single lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("catalog data unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("completion service failed: {0}")]
    AiService(#[from] CompletionError),

    /// `raw` holds the fence-stripped completion text for diagnosis.
    #[error("completion service returned an invalid format: {source}")]
    AiFormat { raw: String, source: AnswerError },
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set; export it or add it to .env")]
    MissingApiKey { var: &'static str },

    #[error("unknown provider '{0}' (expected 'gemini' or 'openai')")]
    UnknownProvider(String),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_converts_to_unavailable() {
        let err = CatalogError::Io {
            path: PathBuf::from("data.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let lookup: LookupError = err.into();
        assert!(matches!(lookup, LookupError::CatalogUnavailable(_)));
        assert!(lookup.to_string().contains("data unavailable"));
    }

    #[test]
    fn test_missing_key_message_names_variable() {
        let err = ConfigError::MissingApiKey {
            var: "GEMINI_API_KEY",
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
