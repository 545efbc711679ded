use axum::{extract::State, routing::get, Json, Router};
use techlookup_core::LookupError;

use super::{ApiError, RecordView};
use crate::SharedState;

pub fn catalog_routes() -> Router<SharedState> {
    Router::new().route("/catalog", get(list_catalog))
}

/// Full catalog in file order
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Every catalog record", body = Vec<RecordView>),
        (status = 500, description = "Catalog unreadable", body = super::ErrorBody)
    )
)]
pub async fn list_catalog(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RecordView>>, ApiError> {
    let records = state
        .lookup
        .store()
        .load_all()
        .await
        .map_err(LookupError::from)?;
    Ok(Json(records.iter().map(RecordView::from).collect()))
}
