//! HTTP surface of the analysis service.
//!
//! JSON request/response bodies with camelCase fields. Error bodies are
//! `{"message": "..."}` with a human-readable description; internal details
//! never leak.

use crate::error::Error;
use crate::sentiment::SentimentLabel;
use crate::service::{AnalysisResult, AnalysisService};
use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Number of candidates returned by the search-suggestions endpoint
const SEARCH_SUGGESTION_LIMIT: usize = 5;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    service: Arc<AnalysisService>,
}

/// Error wrapper mapping the service taxonomy onto HTTP statuses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "message": self.0.to_string() }))).into_response()
    }
}

/// Build the application router over a configured service
pub fn router(service: Arc<AnalysisService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/api/reviews/analyze", post(analyze_app_reviews))
        .route("/api/reviews/history", get(get_history).delete(clear_history))
        .route("/api/reviews/search", get(search_apps))
        .route("/api/reviews/:id", get(get_analysis_by_id))
        .route("/api/sentiment", post(classify_sentiment))
        .layer(cors)
        .with_state(AppState { service })
}

/// Liveness payload
async fn root() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "API is running" }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeParams {
    app_name: Option<String>,
}

async fn analyze_app_reviews(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let app_name = params
        .app_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Validation("App name or package ID is required".to_string()))?;

    let result = state.service.analyze(app_name).await?;
    Ok(Json(result))
}

async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.history())
}

async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    state.service.clear_history();
    Json(json!({ "message": "Analysis history cleared" }))
}

async fn get_analysis_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let id: u64 = id
        .parse()
        .map_err(|_| Error::Validation("Invalid analysis ID".to_string()))?;

    let result = state.service.result_by_id(id)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

async fn search_apps(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let query = params.query.as_deref().unwrap_or("");
    let candidates = state
        .service
        .search_apps(query, SEARCH_SUGGESTION_LIMIT)
        .await?;
    Ok(Json(candidates).into_response())
}

#[derive(Debug, Deserialize)]
struct SentimentRequest {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct SentimentResponse {
    sentiment: SentimentLabel,
    score: u8,
    confidence: f64,
}

async fn classify_sentiment(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let text = request.text.as_deref().unwrap_or("");
    let verdict = state.service.classify_text(text).await?;

    Ok(Json(SentimentResponse {
        sentiment: verdict.label,
        score: verdict.score,
        confidence: verdict.confidence,
    }))
}
