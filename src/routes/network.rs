// Connection listing and network tool delegation

use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use serde::Deserialize;
use std::time::Duration;

use super::{ApiError, AppState, delegate_response};
use crate::command_runner::{self, validate_plain_arg};

const PING_TIMEOUT: Duration = Duration::from_secs(10);
const TRACEROUTE_TIMEOUT: Duration = Duration::from_secs(30);
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(60);

/// GET /api/network — current connections, max 20, OS order.
pub(super) async fn connections(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .net_repo
        .connections()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(records))
}

/// GET /api/network/interfaces
pub(super) async fn interfaces(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.sysinfo_repo.interfaces().await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub(super) struct HostRequest {
    host: String,
}

/// POST /api/network/ping — `ping -c 4 <host>`, output relayed verbatim.
pub(super) async fn ping(Json(req): Json<HostRequest>) -> Result<Response, ApiError> {
    validate_plain_arg(&req.host).map_err(ApiError::bad_request)?;
    Ok(delegate_response(
        command_runner::run("ping", &["-c", "4", &req.host], PING_TIMEOUT).await,
    ))
}

/// POST /api/network/traceroute
pub(super) async fn traceroute(Json(req): Json<HostRequest>) -> Result<Response, ApiError> {
    validate_plain_arg(&req.host).map_err(ApiError::bad_request)?;
    Ok(delegate_response(
        command_runner::run("traceroute", &[req.host.as_str()], TRACEROUTE_TIMEOUT).await,
    ))
}

#[derive(Debug, Deserialize)]
pub(super) struct CaptureRequest {
    interface: String,
    #[serde(default = "default_capture_count")]
    count: u32,
}

fn default_capture_count() -> u32 {
    10
}

/// POST /api/network/capture/start — bounded tcpdump capture.
pub(super) async fn capture_start(Json(req): Json<CaptureRequest>) -> Result<Response, ApiError> {
    validate_plain_arg(&req.interface).map_err(ApiError::bad_request)?;
    let count = req.count.clamp(1, 1000).to_string();
    Ok(delegate_response(
        command_runner::run(
            "tcpdump",
            &["-i", &req.interface, "-c", &count, "-nn"],
            CAPTURE_TIMEOUT,
        )
        .await,
    ))
}
