//! # Search API
//!
//! `POST /api/search` runs the full lookup flow. `POST /api/search-ai` goes
//! straight to the completion service and answers with the bare record.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use techlookup_core::lookup::EMPTY_TERM_MESSAGE;
use techlookup_core::LookupOutcome;
use utoipa::ToSchema;

use super::{ApiError, ErrorBody, RecordView};
use crate::SharedState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Technology name, or `*` for the whole catalog
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<RecordView>,
    pub ai_generated: bool,
    /// Only set for AI-generated results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&LookupOutcome> for SearchResponse {
    fn from(outcome: &LookupOutcome) -> Self {
        let persisted = match outcome {
            LookupOutcome::Generated { persisted, .. } => Some(*persisted),
            _ => None,
        };
        Self {
            results: outcome.records().iter().map(RecordView::from).collect(),
            ai_generated: outcome.is_ai_generated(),
            persisted,
            message: outcome.message().map(str::to_string),
        }
    }
}

pub fn search_routes() -> Router<SharedState> {
    Router::new()
        .route("/search", post(search))
        .route("/search-ai", post(search_ai))
}

/// Look a term up in the catalog, falling back to the AI service
#[utoipa::path(
    post,
    path = "/api/search",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Lookup result", body = SearchResponse),
        (status = 500, description = "Catalog or AI failure", body = ErrorBody)
    )
)]
pub async fn search(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let outcome = state.lookup.lookup(&req.term).await?;
    Ok(Json(SearchResponse::from(&outcome)))
}

/// Ask the AI service about a term and cache the answer
#[utoipa::path(
    post,
    path = "/api/search-ai",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Generated record, or an error object when the term is not a technology", body = RecordView),
        (status = 400, description = "Empty term", body = ErrorBody),
        (status = 500, description = "AI call or format failure", body = ErrorBody)
    )
)]
pub async fn search_ai(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.lookup.synthesize(&req.term).await?;

    Ok(ai_response(&outcome))
}

/// Map an AI-only outcome to the bare record / `{error}` wire shape
fn ai_response(outcome: &LookupOutcome) -> Response {
    match outcome {
        LookupOutcome::Generated { record, .. } => Json(RecordView::from(record)).into_response(),
        LookupOutcome::NotFound { reason } => Json(ErrorBody::new(reason.as_str())).into_response(),
        LookupOutcome::EmptyTerm => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(EMPTY_TERM_MESSAGE)),
        )
            .into_response(),
        LookupOutcome::Catalog(_) => {
            tracing::error!("AI search produced catalog results");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Unexpected AI search result.")),
            )
                .into_response()
        }
    }
}
