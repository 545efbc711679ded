//! # Lookup Service
//!
//! Cache-augmented technology lookup:
//!
//! 1. empty term: report [`LookupOutcome::EmptyTerm`] without touching the store
//! 2. wildcard `*`: the whole catalog, sorted by name
//! 3. local case-insensitive substring match, catalog order
//! 4. on a miss, ask the completion client and normalize its answer
//! 5. persist a recognized technology and return it tagged as AI generated
//!
//! Persisting the generated record is best effort: a failed append is logged and
//! reported through `persisted: false`, never as an error.

pub mod normalize;
pub mod prompt;

use crate::catalog::{CatalogStore, TechnologyRecord};
use crate::error::LookupError;
use crate::llm::CompletionClient;
use normalize::AiAnswer;
use std::cmp::Ordering;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Search term that lists the whole catalog
pub const WILDCARD: &str = "*";

pub const EMPTY_TERM_MESSAGE: &str = "Please enter a term to search.";
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Result of a single lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The term was empty; nothing was searched
    EmptyTerm,
    /// Records served from the catalog
    Catalog(Vec<TechnologyRecord>),
    /// Record synthesized by the completion service
    Generated {
        record: TechnologyRecord,
        persisted: bool,
    },
    /// The completion service did not recognize the term
    NotFound { reason: String },
}

impl LookupOutcome {
    pub fn records(&self) -> &[TechnologyRecord] {
        match self {
            LookupOutcome::Catalog(records) => records,
            LookupOutcome::Generated { record, .. } => std::slice::from_ref(record),
            LookupOutcome::EmptyTerm | LookupOutcome::NotFound { .. } => &[],
        }
    }

    pub fn is_ai_generated(&self) -> bool {
        matches!(self, LookupOutcome::Generated { .. })
    }

    /// User-facing message for outcomes without records
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LookupOutcome::EmptyTerm => Some(EMPTY_TERM_MESSAGE),
            LookupOutcome::NotFound { .. } => Some(NO_RESULTS_MESSAGE),
            LookupOutcome::Catalog(records) if records.is_empty() => Some(NO_RESULTS_MESSAGE),
            _ => None,
        }
    }
}

pub struct LookupService {
    store: Arc<CatalogStore>,
    client: Arc<dyn CompletionClient>,
}

impl LookupService {
    pub fn new(store: Arc<CatalogStore>, client: Arc<dyn CompletionClient>) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Run the full lookup flow for `term`, trimmed of surrounding whitespace
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, term: &str) -> Result<LookupOutcome, LookupError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(LookupOutcome::EmptyTerm);
        }

        let records = self.store.load_all().await?;

        if term == WILDCARD {
            return Ok(LookupOutcome::Catalog(sort_by_name(records)));
        }

        let matches = search_local(&records, term);
        if !matches.is_empty() {
            tracing::debug!(count = matches.len(), "Served from catalog");
            return Ok(LookupOutcome::Catalog(matches));
        }

        tracing::info!("No catalog match, asking completion service");
        self.synthesize(term).await
    }

    /// Ask the completion service about `term` and cache a recognized answer.
    ///
    /// Skips the local search.
    #[tracing::instrument(skip(self), fields(model = %self.client.model()))]
    pub async fn synthesize(&self, term: &str) -> Result<LookupOutcome, LookupError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(LookupOutcome::EmptyTerm);
        }

        let raw = self
            .client
            .complete(&prompt::technology_prompt(term))
            .await
            .inspect_err(|e| tracing::error!("Completion call failed: {}", e))?;

        match normalize::parse_answer(&raw) {
            Err(source) => {
                let raw = normalize::strip_code_fences(&raw);
                tracing::error!(raw = %raw, "Completion answer rejected: {}", source);
                Err(LookupError::AiFormat { raw, source })
            }
            Ok(AiAnswer::Unrecognized(reason)) => {
                tracing::info!(reason = %reason, "Term not recognized as a technology");
                Ok(LookupOutcome::NotFound { reason })
            }
            Ok(AiAnswer::Technology(record)) => {
                let persisted = match self.store.append(record.clone()).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Failed to cache generated record: {}", e);
                        false
                    }
                };
                tracing::info!(name = %record.name, persisted, "Generated record");
                Ok(LookupOutcome::Generated { record, persisted })
            }
        }
    }
}

/// Records whose name contains `term`, ignoring case, in catalog order
pub fn search_local(records: &[TechnologyRecord], term: &str) -> Vec<TechnologyRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.name_contains(&needle))
        .cloned()
        .collect()
}

/// Sort by name ignoring case and accents, falling back to the exact string
pub fn sort_by_name(mut records: Vec<TechnologyRecord>) -> Vec<TechnologyRecord> {
    records.sort_by(|a, b| compare_names(&a.name, &b.name));
    records
}

fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnswerError, CompletionError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    /// Completion double that replays a fixed answer and records prompts
    struct ScriptedClient {
        answer: Mutex<Option<Result<String, CompletionError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(Ok(text.to_string()))),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: CompletionError) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(Err(err))),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(CompletionError::EmptyResponse))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    const CATALOG: &str = r#"[
        {"name":"Python","year":1991,"description":"General purpose."},
        {"name":"JavaScript","year":1995,"description":"Language of the web."},
        {"name":"java","year":1995,"description":"JVM language."},
        {"name":"Élixir","year":2012,"description":"BEAM language."},
        {"name":"Docker","year":2013,"description":"Containers."}
    ]"#;

    fn service_with(
        content: Option<&str>,
        client: Arc<ScriptedClient>,
    ) -> (tempfile::TempDir, LookupService) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        let service = LookupService::new(Arc::new(CatalogStore::new(path)), client);
        (dir, service)
    }

    fn names(records: &[TechnologyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_term_never_touches_store() {
        let client = ScriptedClient::answering("{}");
        // No catalog file exists: any store access would fail.
        let (_dir, service) = service_with(None, client.clone());

        for term in ["", "   "] {
            let outcome = service.lookup(term).await.unwrap();
            assert_eq!(outcome, LookupOutcome::EmptyTerm);
            assert_eq!(outcome.message(), Some(EMPTY_TERM_MESSAGE));
        }
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_substring_match_keeps_catalog_order() {
        let client = ScriptedClient::answering("{}");
        let (_dir, service) = service_with(Some(CATALOG), client.clone());

        let outcome = service.lookup("JAVA").await.unwrap();
        assert_eq!(names(outcome.records()), vec!["JavaScript", "java"]);
        assert!(!outcome.is_ai_generated());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_wildcard_sorts_whole_catalog() {
        let client = ScriptedClient::answering("{}");
        let (_dir, service) = service_with(Some(CATALOG), client.clone());

        let outcome = service.lookup("*").await.unwrap();
        assert_eq!(
            names(outcome.records()),
            vec!["Docker", "Élixir", "java", "JavaScript", "Python"]
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_term_is_trimmed_for_every_step() {
        let client = ScriptedClient::answering("{}");
        let (_dir, service) = service_with(Some(CATALOG), client.clone());

        let outcome = service.lookup(" Java\t").await.unwrap();
        assert_eq!(names(outcome.records()), vec!["JavaScript", "java"]);

        let outcome = service.lookup("  *  ").await.unwrap();
        assert_eq!(outcome.records().len(), 5);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_wildcard_on_empty_and_single_catalogs() {
        let (_dir, service) = service_with(Some("[]"), ScriptedClient::answering("{}"));
        let outcome = service.lookup("*").await.unwrap();
        assert_eq!(outcome, LookupOutcome::Catalog(vec![]));
        assert_eq!(outcome.message(), Some(NO_RESULTS_MESSAGE));

        let (_dir, service) = service_with(
            Some(r#"[{"name":"Go","description":"Compiled."}]"#),
            ScriptedClient::answering("{}"),
        );
        let outcome = service.lookup("*").await.unwrap();
        assert_eq!(names(outcome.records()), vec!["Go"]);
    }

    #[tokio::test]
    async fn test_miss_generates_and_persists_record() {
        let client = ScriptedClient::answering(
            "```json\n{\"name\":\"Rust\",\"year\":2010,\"description\":\"...\",\"link\":\"https://rust-lang.org\"}\n```",
        );
        let (_dir, service) = service_with(Some(CATALOG), client.clone());

        let outcome = service.lookup("Rust").await.unwrap();
        let expected = TechnologyRecord::new("Rust", "...")
            .with_year(2010)
            .with_link("https://rust-lang.org");
        assert_eq!(
            outcome,
            LookupOutcome::Generated {
                record: expected.clone(),
                persisted: true
            }
        );
        assert!(outcome.is_ai_generated());

        let catalog = service.store().load_all().await.unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.last(), Some(&expected));

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"Rust\""));
    }

    #[tokio::test]
    async fn test_generated_record_is_served_locally_next_time() {
        let client = ScriptedClient::answering(r#"{"name":"Rust","year":2010}"#);
        let (_dir, service) = service_with(Some("[]"), client.clone());

        assert!(service.lookup("rust").await.unwrap().is_ai_generated());
        let second = service.lookup("rust").await.unwrap();
        assert!(!second.is_ai_generated());
        assert_eq!(names(second.records()), vec!["Rust"]);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_term_appends_nothing() {
        let client = ScriptedClient::answering(r#"{"error":"not a technology"}"#);
        let (_dir, service) = service_with(Some(CATALOG), client);

        let outcome = service.lookup("xyzzy123").await.unwrap();
        assert_eq!(
            outcome,
            LookupOutcome::NotFound {
                reason: "not a technology".to_string()
            }
        );
        assert!(outcome.records().is_empty());
        assert_eq!(service.store().load_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_malformed_answer_is_format_error_with_raw_text() {
        let client = ScriptedClient::answering("```json\nI think Rust is great!\n```");
        let (_dir, service) = service_with(Some(CATALOG), client);

        let err = service.lookup("Rust").await.unwrap_err();
        match err {
            LookupError::AiFormat { raw, source } => {
                assert_eq!(raw, "I think Rust is great!");
                assert!(matches!(source, AnswerError::NotJson(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(service.store().load_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_completion_failure_is_ai_service_error() {
        let client = ScriptedClient::failing(CompletionError::Api {
            status: 503,
            body: "overloaded".to_string(),
        });
        let (_dir, service) = service_with(Some(CATALOG), client);

        let err = service.lookup("Rust").await.unwrap_err();
        assert!(matches!(err, LookupError::AiService(_)));
    }

    #[tokio::test]
    async fn test_unreadable_catalog_is_unavailable() {
        let (_dir, service) = service_with(Some("not json"), ScriptedClient::answering("{}"));
        let err = service.lookup("Rust").await.unwrap_err();
        assert!(matches!(err, LookupError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_persist_failure_still_returns_record() {
        // synthesize() skips the read, so a missing file only fails the append.
        let client = ScriptedClient::answering(r#"{"name":"Rust","year":2010}"#);
        let (_dir, service) = service_with(None, client);

        let outcome = service.synthesize("Rust").await.unwrap();
        assert_eq!(
            outcome,
            LookupOutcome::Generated {
                record: TechnologyRecord::new("Rust", "").with_year(2010),
                persisted: false
            }
        );
    }

    #[test]
    fn test_search_local_is_case_insensitive_substring() {
        let records: Vec<TechnologyRecord> = serde_json::from_str(CATALOG).unwrap();
        assert_eq!(names(&search_local(&records, "THON")), vec!["Python"]);
        assert_eq!(names(&search_local(&records, "o")), vec!["Python", "Docker"]);
        assert!(search_local(&records, "rust").is_empty());
    }

    #[test]
    fn test_compare_names_ignores_case_and_accents() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("éclair", "Eclipse"), Ordering::Less);
        assert_eq!(compare_names("Zig", "ada"), Ordering::Greater);
        assert_eq!(compare_names("Go", "Go"), Ordering::Equal);
    }
}
