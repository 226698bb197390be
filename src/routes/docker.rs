// Docker CLI handlers

use axum::response::{IntoResponse, Response};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use super::{ApiError, AppState, delegate_response};
use crate::command_runner::validate_plain_arg;

#[derive(Debug, Deserialize)]
pub(super) struct ContainersQuery {
    #[serde(default)]
    all: bool,
}

/// GET /api/containers — degrades with docker_installed/daemon_running
/// flags instead of failing when the CLI or daemon is absent.
pub(super) async fn containers(
    State(state): State<AppState>,
    Query(q): Query<ContainersQuery>,
) -> impl IntoResponse {
    Json(state.docker_repo.list_containers(q.all).await)
}

#[derive(Debug, Deserialize)]
pub(super) struct ContainerActionRequest {
    id: String,
}

/// POST /api/containers/{start|stop|remove}
pub(super) async fn container_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(req): Json<ContainerActionRequest>,
) -> Result<Response, ApiError> {
    let verb = match action.as_str() {
        "start" => "start",
        "stop" => "stop",
        "remove" => "rm",
        other => {
            return Err(ApiError::bad_request(format!(
                "unknown container action {:?}",
                other
            )));
        }
    };
    validate_plain_arg(&req.id).map_err(ApiError::bad_request)?;
    Ok(delegate_response(
        state.docker_repo.container_action(verb, &req.id).await,
    ))
}

/// GET /api/docker/images
pub(super) async fn images(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.docker_repo.list_images().await)
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    term: String,
}

/// POST /api/docker/search
pub(super) async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_plain_arg(&req.term).map_err(ApiError::bad_request)?;
    Ok(Json(state.docker_repo.search(&req.term).await))
}
