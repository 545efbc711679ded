//! # HTTP API
//!
//! JSON endpoints over the lookup service, plus the response types shared by
//! them and by the OpenAPI document.

pub mod catalog;
pub mod search;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use techlookup_core::{LookupError, TechnologyRecord};
use utoipa::ToSchema;

/// A catalog record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl From<&TechnologyRecord> for RecordView {
    fn from(record: &TechnologyRecord) -> Self {
        Self {
            name: record.name.clone(),
            year: record.year_created,
            description: record.description.clone(),
            link: record.link.clone(),
            logo: record.logo.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Lookup failure rendered as a 500 with an [`ErrorBody`]
pub struct ApiError(pub LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.0 {
            LookupError::CatalogUnavailable(e) => {
                ErrorBody::new("Could not load the catalog. Try again later.")
                    .with_detail(e.to_string())
            }
            LookupError::AiService(e) => {
                ErrorBody::new("Internal error while contacting the AI service.")
                    .with_detail(e.to_string())
            }
            LookupError::AiFormat { raw, .. } => {
                ErrorBody::new("The AI returned an invalid format. Try again.").with_detail(raw)
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
