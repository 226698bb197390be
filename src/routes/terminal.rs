// Arbitrary shell execution handler.
//
// No allow-list and no authentication: the command runs with the server's
// privileges. Keep this bound to localhost.

use axum::Json;
use axum::response::Response;
use serde::Deserialize;
use std::time::Duration;

use super::{ApiError, delegate_response};
use crate::command_runner;

const TERMINAL_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
pub(super) struct ExecuteRequest {
    command: String,
}

/// POST /api/terminal/execute
pub(super) async fn execute(Json(req): Json<ExecuteRequest>) -> Result<Response, ApiError> {
    if req.command.trim().is_empty() {
        return Err(ApiError::bad_request("command must be non-empty"));
    }
    Ok(delegate_response(
        command_runner::run_shell(&req.command, TERMINAL_TIMEOUT).await,
    ))
}
