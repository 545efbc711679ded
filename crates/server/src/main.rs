//! Techlookup Server
//!
//! Axum server and CLI over the technology lookup service. The completion
//! client is built once at startup and shared by every request.

mod api;
mod page;

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, Response},
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use techlookup_core::config::catalog_path_from_env;
use techlookup_core::render::render_text;
use techlookup_core::{CatalogStore, LookupConfig, LookupOutcome, LookupService};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use api::{catalog, search};

const DEFAULT_PORT: u16 = 3000;

/// Application state
pub struct AppState {
    pub lookup: LookupService,
}

pub type SharedState = Arc<AppState>;

#[derive(Parser)]
#[command(author, version, about = "Techlookup - technology catalog with AI fallback")]
struct Args {
    /// Catalog file (overrides TECHLOOKUP_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Address to bind
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
        host: IpAddr,
    },
    /// Look a term up once and print the result cards
    Search {
        /// Technology name, or `*` for the whole catalog
        term: String,
    },
    /// Create an empty catalog file if none exists
    Init,
}

#[derive(OpenApi)]
#[openapi(
    paths(search::search, search::search_ai, catalog::list_catalog),
    components(schemas(
        search::SearchRequest,
        search::SearchResponse,
        api::RecordView,
        api::ErrorBody
    )),
    tags(
        (name = "search", description = "Catalog lookup with AI fallback"),
        (name = "catalog", description = "Raw catalog access")
    )
)]
struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    let spec = ApiDoc::openapi().to_json().unwrap_or_default();
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(spec))
        .unwrap_or_default()
}

async fn health() -> &'static str {
    "ok"
}

fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = search::search_routes()
        .merge(catalog::catalog_routes())
        .route("/openapi.json", get(serve_openapi));

    Router::new()
        .route("/", get(page::search_page))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load configuration and wire the lookup service; fails fast on a missing key
fn build_service(catalog: Option<PathBuf>) -> anyhow::Result<LookupService> {
    let mut config = LookupConfig::from_env().context("Invalid configuration")?;
    if let Some(path) = catalog {
        config = config.with_catalog_path(path);
    }

    let client = config
        .model
        .create_client()
        .context("Failed to build completion client")?;
    tracing::info!(
        provider = config.model.provider.display_name(),
        model = %config.model.model,
        catalog = ?config.catalog_path,
        "Lookup service configured"
    );

    let store = Arc::new(CatalogStore::new(config.catalog_path));
    Ok(LookupService::new(store, client))
}

async fn run_server(service: LookupService, addr: SocketAddr) -> anyhow::Result<()> {
    match service.store().load_all().await {
        Ok(records) => println!("📚 Loaded {} catalog records", records.len()),
        Err(e) => eprintln!("⚠️ Catalog not readable yet: {}", e),
    }

    let state: SharedState = Arc::new(AppState { lookup: service });
    let app = build_router(state);

    println!("🚀 Techlookup running at http://{}", addr);
    println!("   Page:      /?term=...");
    println!("   Search:    POST /api/search, POST /api/search-ai");
    println!("   Catalog:   GET /api/catalog");
    println!("   OpenAPI:   GET /api/openapi.json");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "techlookup=info,techlookup_core=info,tower_http=info".into()
            }),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let command = args.command.unwrap_or(CliCommand::Serve {
        port: DEFAULT_PORT,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
    });

    match command {
        CliCommand::Serve { port, host } => {
            println!("╔══════════════════════════════════════╗");
            println!("║          TECHLOOKUP SERVER           ║");
            println!("╚══════════════════════════════════════╝");
            let service = build_service(args.catalog)?;
            run_server(service, SocketAddr::new(host, port)).await
        }
        CliCommand::Search { term } => {
            let service = build_service(args.catalog)?;
            let outcome = service.lookup(&term).await?;
            print!("{}", render_text(&outcome));
            if let LookupOutcome::Generated {
                persisted: false, ..
            } = outcome
            {
                eprintln!("⚠️ Result could not be saved to the catalog");
            }
            Ok(())
        }
        CliCommand::Init => {
            let store = CatalogStore::new(args.catalog.unwrap_or_else(catalog_path_from_env));
            if store.init().await? {
                println!("✅ Created empty catalog at {}", store.path().display());
            } else {
                println!("Catalog already exists at {}", store.path().display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use techlookup_core::error::CompletionError;
    use techlookup_core::llm::CompletionClient;
    use tower::ServiceExt;

    /// Completion double that answers once, then fails
    struct ScriptedClient {
        answer: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.answer
                .lock()
                .unwrap()
                .take()
                .ok_or(CompletionError::EmptyResponse)
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn app_with(catalog: &str, answer: Option<&str>) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, catalog).unwrap();

        let client = Arc::new(ScriptedClient {
            answer: Mutex::new(answer.map(str::to_string)),
        });
        let service = LookupService::new(Arc::new(CatalogStore::new(path)), client);
        let app = build_router(Arc::new(AppState { lookup: service }));
        (dir, app)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    const CATALOG: &str = r#"[{"name":"Python","year":1991,"description":"General purpose."}]"#;

    #[tokio::test]
    async fn test_search_ai_returns_and_caches_record() {
        let (dir, app) = app_with(
            CATALOG,
            Some(r#"```json
{"name":"Rust","year":2010,"description":"...","link":"https://rust-lang.org"}
```"#),
        );

        let (status, body) = post_json(app, "/api/search-ai", json!({ "term": "Rust" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "name": "Rust",
                "year": 2010,
                "description": "...",
                "link": "https://rust-lang.org"
            })
        );

        let saved = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert!(saved.contains("\"name\": \"Rust\""));
    }

    #[tokio::test]
    async fn test_search_ai_unrecognized_term() {
        let (dir, app) = app_with(CATALOG, Some(r#"{"error":"not a technology"}"#));

        let (status, body) =
            post_json(app, "/api/search-ai", json!({ "term": "xyzzy123" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "not a technology" }));

        let saved = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(saved, CATALOG);
    }

    #[tokio::test]
    async fn test_search_ai_malformed_answer_is_500_with_raw_text() {
        let (_dir, app) = app_with(CATALOG, Some("Rust is a language, I think."));

        let (status, body) = post_json(app, "/api/search-ai", json!({ "term": "Rust" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Rust is a language, I think.");
        assert!(body["error"].as_str().unwrap().contains("invalid format"));
    }

    #[tokio::test]
    async fn test_search_ai_service_failure_is_500() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, body) = post_json(app, "/api/search-ai", json!({ "term": "Rust" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_search_ai_empty_term_is_400() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, body) = post_json(app, "/api/search-ai", json!({ "term": "  " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_search_serves_local_match_without_ai() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, body) = post_json(app, "/api/search", json!({ "term": "pyth" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_generated"], false);
        assert_eq!(body["results"][0]["name"], "Python");
        assert!(body.get("persisted").is_none());
    }

    #[tokio::test]
    async fn test_search_falls_back_to_ai() {
        let (_dir, app) = app_with(CATALOG, Some(r#"{"name":"Rust","year":2010}"#));

        let (status, body) = post_json(app, "/api/search", json!({ "term": "rust" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_generated"], true);
        assert_eq!(body["persisted"], true);
        assert_eq!(body["results"][0]["name"], "Rust");
    }

    #[tokio::test]
    async fn test_search_empty_term_has_message() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, body) = post_json(app, "/api/search", json!({ "term": "" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!([]));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_catalog_listing() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, text) = get_text(app, "/api/catalog").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_renders_cards() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, html) = get_text(app, "/?term=*").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h2>Python</h2>"));
        assert!(html.contains("value=\"*\""));
    }

    #[tokio::test]
    async fn test_openapi_lists_search_routes() {
        let (_dir, app) = app_with(CATALOG, None);

        let (status, text) = get_text(app, "/api/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("/api/search-ai"));
    }
}
