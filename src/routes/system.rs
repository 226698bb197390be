// System telemetry and process handlers

use axum::response::{Html, IntoResponse};
use axum::{Json, extract::State};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::version::{NAME, VERSION};

/// GET / — the embedded dashboard page.
pub(super) async fn dashboard() -> impl IntoResponse {
    Html(include_str!("../../static/dashboard.html"))
}

/// GET /version — service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/system — CPU/memory/disk percentages.
pub(super) async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.sysinfo_repo.metrics_snapshot().await?;
    Ok(Json(snapshot))
}

/// GET /api/system/info — static host identity (fetched once at startup).
pub(super) async fn info(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.system_info.as_ref().clone())
}

/// GET /api/processes — top 50 by CPU, descending.
pub(super) async fn processes(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.sysinfo_repo.processes().await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub(super) struct KillRequest {
    pid: u32,
}

/// POST /api/processes/kill — sends a kill signal; reports acceptance only.
pub(super) async fn kill_process(
    State(state): State<AppState>,
    Json(req): Json<KillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let killed = state.sysinfo_repo.kill_process(req.pid).await?;
    let message = if killed {
        format!("kill signal sent to pid {}", req.pid)
    } else {
        format!("pid {} not found or signal refused", req.pid)
    };
    Ok(Json(serde_json::json!({
        "success": killed,
        "message": message,
    })))
}

/// GET /api/disk — per-partition usage.
pub(super) async fn disks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let partitions = state.sysinfo_repo.disks().await?;
    Ok(Json(partitions))
}
