//! Health handler

use crate::api::rest::state::AppState;
use crate::sample::LinkState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub link_state: LinkState,
    pub last_success_epoch: i64,
    pub consecutive_timeouts: u32,
    pub parse_errors: u64,
    pub reconnects: u64,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint. Always 200; sensor trouble shows up in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let snap = state.store.snapshot();
    let status = match snap.link_state {
        LinkState::Connected => "healthy",
        LinkState::Stale => "degraded",
        LinkState::Disconnected => "unhealthy",
    };

    Json(HealthCheckResponse {
        status: status.to_string(),
        link_state: snap.link_state,
        last_success_epoch: snap.sample.last_success_epoch,
        consecutive_timeouts: snap.consecutive_timeouts,
        parse_errors: snap.parse_errors,
        reconnects: snap.reconnects,
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}
