//! Market analysis service and its JSON endpoint.
//!
//! `POST /api/analyze` accepts `{ "url": "<text>" }` and answers with the
//! metrics record for that market plus an echo of the URL. Any request
//! that does not carry a usable text URL is a 400; source failures are a
//! 500 with a descriptive body, never a silent fallback to mock data.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::metrics::{MarketMetrics, MOCK_DATA_MESSAGE};
use crate::source::MarketDataSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub metrics: MarketMetrics,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// The request carried no usable text URL.
    #[error("Invalid URL")]
    InvalidUrl,
    /// The market data source failed.
    #[error("{0}")]
    Source(String),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::InvalidUrl => StatusCode::BAD_REQUEST,
            AnalyzeError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Runs one analysis round: shape-validate the URL, then ask the source.
///
/// Both the JSON endpoint and the dashboard form flow go through here, so
/// the two surfaces cannot drift apart. An absent or empty URL is invalid;
/// beyond that the URL's content is the source's concern.
pub fn run_analysis(
    source: &dyn MarketDataSource,
    url: Option<&str>,
) -> Result<AnalyzeResponse, AnalyzeError> {
    let url = url.filter(|u| !u.is_empty()).ok_or(AnalyzeError::InvalidUrl)?;

    let metrics = source
        .fetch_metrics(url)
        .map_err(|err| AnalyzeError::Source(err.to_string()))?;

    Ok(AnalyzeResponse {
        url: url.to_string(),
        metrics,
        message: MOCK_DATA_MESSAGE.to_string(),
    })
}

#[derive(Clone)]
struct AnalyzeAppState {
    source: Arc<dyn MarketDataSource>,
}

/// Router for the JSON analyze endpoint.
pub fn analyze_router(source: Arc<dyn MarketDataSource>) -> Router {
    Router::new()
        .route("/api/analyze", post(post_analyze))
        .with_state(AnalyzeAppState { source })
}

async fn post_analyze(
    State(state): State<AnalyzeAppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let url = payload
        .ok()
        .and_then(|Json(body)| body.get("url").and_then(Value::as_str).map(str::to_string));

    info!(
        component = "dashboard_server",
        event = "http.analyze.request",
        url = url.as_deref().unwrap_or("")
    );

    match run_analysis(state.source.as_ref(), url.as_deref()) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            warn!(
                component = "dashboard_server",
                event = failure_event(&err),
                error = %err
            );
            (err.status(), Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}

fn failure_event(err: &AnalyzeError) -> &'static str {
    match err {
        AnalyzeError::InvalidUrl => "http.analyze.invalid_url",
        AnalyzeError::Source(_) => "http.analyze.source_error",
    }
}
