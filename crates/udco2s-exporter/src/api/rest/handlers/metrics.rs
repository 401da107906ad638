//! Prometheus scrape handler

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::metrics::TEXT_CONTENT_TYPE;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

/// Handler for GET /metrics
pub async fn scrape_metrics(State(state): State<AppState>) -> ApiResult<Response> {
    let body = state.metrics.export()?;
    Ok(([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], body).into_response())
}
