//! # Configuration
//!
//! Runtime settings come from the process environment (a `.env` file is loaded
//! by the binary before this runs). The API key is required up front so a
//! missing credential fails at startup instead of on the first cache miss.

use crate::error::ConfigError;
use crate::models::{LlmProvider, ModelConfig};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "data.json";

/// Everything needed to build the lookup service
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub model: ModelConfig,
    pub catalog_path: PathBuf,
}

impl LookupConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read configuration through `var`, which returns the value of a variable
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let provider = match non_empty("TECHLOOKUP_PROVIDER") {
            Some(value) => {
                LlmProvider::parse(&value).ok_or(ConfigError::UnknownProvider(value))?
            }
            None => LlmProvider::default(),
        };

        let api_key_var = provider.api_key_var();
        let api_key =
            non_empty(api_key_var).ok_or(ConfigError::MissingApiKey { var: api_key_var })?;

        let mut model = ModelConfig::new(provider, api_key);
        if let Some(name) = non_empty("TECHLOOKUP_MODEL") {
            model = model.with_model(name);
        }
        if let Some(url) = non_empty("TECHLOOKUP_BASE_URL") {
            model = model.with_base_url(url);
        }
        if let Some(value) = non_empty("TECHLOOKUP_AI_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: "TECHLOOKUP_AI_TIMEOUT_SECS",
                    value,
                })?;
            model = model.with_timeout_secs(secs);
        }

        Ok(Self {
            model,
            catalog_path: catalog_path_from_vars(&var),
        })
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }
}

/// Catalog location from `TECHLOOKUP_CATALOG_PATH`, without requiring an API key
pub fn catalog_path_from_env() -> PathBuf {
    catalog_path_from_vars(|key| std::env::var(key).ok())
}

fn catalog_path_from_vars<F>(var: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    var("TECHLOOKUP_CATALOG_PATH")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}
