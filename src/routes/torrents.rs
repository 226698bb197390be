// Tor control and mock torrent handlers

use axum::response::{IntoResponse, Response};
use axum::{
    Json,
    extract::{Path, State},
};

use super::{ApiError, AppState, delegate_response};
use crate::command_runner::CommandError;
use crate::models::AddTorrentRequest;
use crate::torrent_repo::{self, TorrentError};

impl From<TorrentError> for ApiError {
    fn from(e: TorrentError) -> Self {
        match e {
            TorrentError::NotFound(id) => ApiError::not_found(format!("no torrent with id {}", id)),
            other => {
                tracing::warn!(error = %other, "torrent store failure");
                ApiError::internal(other.to_string())
            }
        }
    }
}

/// GET /api/tor/status
pub(super) async fn tor_status() -> impl IntoResponse {
    match torrent_repo::tor_status().await {
        Ok(running) => Json(serde_json::json!({
            "installed": true,
            "running": running,
        })),
        Err(e) => Json(serde_json::json!({
            "installed": !matches!(e, CommandError::ToolMissing(_)),
            "running": false,
            "message": e.to_string(),
        })),
    }
}

/// POST /api/tor/start — spawns the daemon detached.
pub(super) async fn tor_start() -> impl IntoResponse {
    match torrent_repo::tor_start().await {
        Ok(message) => Json(serde_json::json!({ "success": true, "message": message })),
        Err(e) => Json(serde_json::json!({ "success": false, "message": e.to_string() })),
    }
}

/// POST /api/tor/stop
pub(super) async fn tor_stop() -> Response {
    delegate_response(torrent_repo::tor_stop().await)
}

// The store is a synchronous file read-modify-write; keep it off the
// async runtime like the other blocking call sites.
async fn run_store<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TorrentError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("torrent task join: {}", e)))?
        .map_err(ApiError::from)
}

/// GET /api/torrents — listing doubles as the mock progress tick.
pub(super) async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = state.torrent_repo.clone();
    Ok(Json(run_store(move || repo.list_and_tick()).await?))
}

/// POST /api/torrents/add
pub(super) async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddTorrentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() || req.url.trim().is_empty() {
        return Err(ApiError::bad_request("name and url must be non-empty"));
    }
    let repo = state.torrent_repo.clone();
    Ok(Json(run_store(move || repo.add(req)).await?))
}

/// POST /api/torrents/{id}/pause
pub(super) async fn pause(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.torrent_repo.clone();
    Ok(Json(run_store(move || repo.pause(&id)).await?))
}

/// POST /api/torrents/{id}/resume
pub(super) async fn resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.torrent_repo.clone();
    Ok(Json(run_store(move || repo.resume(&id)).await?))
}

/// POST /api/torrents/clear-completed
pub(super) async fn clear_completed(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.torrent_repo.clone();
    let removed = run_store(move || repo.clear_completed()).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}
