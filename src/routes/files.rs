// File scan, browse and delete handlers

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::path::PathBuf;

use super::{ApiError, AppState};
use crate::fs_scan::{self, ScanOptions};

/// GET /api/files/scan — large files under the well-known roots, sorted
/// descending by size, max 50.
pub(super) async fn scan(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let opts = ScanOptions {
        min_size: state.config.scan.min_file_size_bytes,
        max_depth: state.config.scan.max_depth,
        max_results: state.config.scan.max_results,
    };
    let entries = tokio::task::spawn_blocking(move || {
        fs_scan::scan_large_files(&fs_scan::default_scan_roots(), &opts)
    })
    .await
    .map_err(|e| ApiError::internal(format!("scan task join: {}", e)))?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub(super) struct BrowseQuery {
    path: Option<String>,
}

/// GET /api/files/browse?path= — directories first, then files, by name.
pub(super) async fn browse(Query(q): Query<BrowseQuery>) -> Result<impl IntoResponse, ApiError> {
    let path = match q.path {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => dirs_next::home_dir().ok_or_else(|| ApiError::internal("no home directory"))?,
    };
    let entries = tokio::task::spawn_blocking(move || fs_scan::browse(&path))
        .await
        .map_err(|e| ApiError::internal(format!("browse task join: {}", e)))?
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteRequest {
    files: Vec<String>,
}

/// POST /api/files/delete — per-path deletion confined to the home
/// directory. Any failure turns the whole response into a client error
/// enumerating the failing paths; successful deletions stand regardless.
pub(super) async fn delete(Json(req): Json<DeleteRequest>) -> Result<impl IntoResponse, ApiError> {
    if req.files.is_empty() {
        return Err(ApiError::bad_request("no files given"));
    }
    let home = dirs_next::home_dir().ok_or_else(|| ApiError::internal("no home directory"))?;
    let report =
        tokio::task::spawn_blocking(move || fs_scan::delete_files(&req.files, Some(&home)))
            .await
            .map_err(|e| ApiError::internal(format!("delete task join: {}", e)))?;
    let status = if report.failed.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(report)))
}
