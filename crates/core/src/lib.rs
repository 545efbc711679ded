//! # Techlookup Core
//!
//! Technology catalog with an AI fallback: search terms are matched against a
//! JSON catalog, and misses are answered by a completion service whose answer is
//! cached back into the catalog.
//!
//! ## Architecture
//!
//! - `catalog/` - Technology records and the JSON file store
//! - `lookup/` - The lookup flow, prompt template and answer normalization
//! - `llm/` - Completion client trait with Gemini and OpenAI-compatible clients
//! - `models` - Provider and model selection
//! - `render` - HTML and plain-text result cards
//! - `config` - Environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use techlookup_core::{CatalogStore, LookupConfig, LookupService};
//!
//! let config = LookupConfig::from_env()?;
//! let client = config.model.create_client()?;
//! let store = Arc::new(CatalogStore::new(&config.catalog_path));
//! let service = LookupService::new(store, client);
//! let outcome = service.lookup("Rust").await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod render;

pub use catalog::{CatalogStore, TechnologyRecord};
pub use config::LookupConfig;
pub use error::{CatalogError, CompletionError, ConfigError, LookupError};
pub use lookup::{LookupOutcome, LookupService};
