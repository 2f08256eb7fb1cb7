//! API handlers for song lookup

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tunelink_search::{LinkResponse, LookupError, SearchQuery};

use crate::server::AppState;

/// Error returned by API handlers, rendered as `{"error": "..."}`.
///
/// Lookups themselves never fail, so the only error a client sees is a
/// rejected request.
#[derive(Debug)]
pub enum ApiError {
    /// The request was incomplete or malformed.
    BadRequest(String),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Validation { reason } => ApiError::BadRequest(reason),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::BadRequest(message) = self;
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Enabled providers, anchor first
    pub providers: Vec<&'static str>,
    /// Seconds since the server started
    pub uptime_secs: u64,
}

/// `GET /search?artist=&track=`
///
/// # Errors
/// - `ApiError::BadRequest` - Artist or track missing or blank; no provider is called
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<LinkResponse>, ApiError> {
    let query = SearchQuery::from_params(
        params.get("artist").map(String::as_str),
        params.get("track").map(String::as_str),
    )
    .inspect_err(|_| debug!(?params, "Rejecting incomplete search"))?;

    Ok(Json(state.search_service.lookup(&query).await))
}

/// `GET /health`
pub async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        providers: state.search_service.provider_names(),
        uptime_secs: state.server_started_at.elapsed().as_secs(),
    })
}
