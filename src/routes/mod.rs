// HTTP routes

mod docker;
mod files;
mod network;
mod services;
mod system;
mod terminal;
mod torrents;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::command_runner::{CommandError, CommandOutput};
use crate::config::AppConfig;
use crate::docker_repo::DockerRepo;
use crate::models::SystemInfo;
use crate::net_repo::NetRepo;
use crate::sysinfo_repo::SysinfoRepo;
use crate::torrent_repo::TorrentRepo;

#[derive(Clone)]
pub struct AppState {
    pub(crate) sysinfo_repo: Arc<SysinfoRepo>,
    pub(crate) net_repo: Arc<NetRepo>,
    pub(crate) docker_repo: Arc<DockerRepo>,
    pub(crate) torrent_repo: Arc<TorrentRepo>,
    pub(crate) system_info: Arc<SystemInfo>,
    pub(crate) config: AppConfig,
}

impl AppState {
    pub fn new(
        sysinfo_repo: Arc<SysinfoRepo>,
        net_repo: Arc<NetRepo>,
        docker_repo: Arc<DockerRepo>,
        torrent_repo: Arc<TorrentRepo>,
        system_info: Arc<SystemInfo>,
        config: AppConfig,
    ) -> Self {
        Self {
            sysinfo_repo,
            net_repo,
            docker_repo,
            torrent_repo,
            system_info,
            config,
        }
    }
}

/// Client-visible error: a status code plus a short human-readable detail
/// string. Internal error chains go to the log, not the wire.
pub(crate) struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::warn!(error = %e, "request failed");
        Self::internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            axum::Json(serde_json::json!({ "detail": self.detail })),
        )
            .into_response()
    }
}

/// Wire shape for delegated commands: exit status plus verbatim output.
#[derive(Debug, Serialize)]
pub(crate) struct CommandResult {
    pub(crate) success: bool,
    pub(crate) output: String,
}

impl From<CommandOutput> for CommandResult {
    fn from(out: CommandOutput) -> Self {
        Self {
            success: out.success,
            output: out.output,
        }
    }
}

/// Maps a delegation result onto the wire. A missing tool or a timeout is
/// a normal degraded response, not a server fault.
pub(crate) fn delegate_response(result: Result<CommandOutput, CommandError>) -> Response {
    match result {
        Ok(out) => axum::Json(CommandResult::from(out)).into_response(),
        Err(e @ (CommandError::ToolMissing(_) | CommandError::TimedOut { .. })) => {
            axum::Json(CommandResult {
                success: false,
                output: e.to_string(),
            })
            .into_response()
        }
        Err(e) => ApiError::internal(e.to_string()).into_response(),
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(system::dashboard))
        .route("/version", get(system::version_handler))
        .route("/api/system", get(system::metrics))
        .route("/api/system/info", get(system::info))
        .route("/api/processes", get(system::processes))
        .route("/api/processes/kill", post(system::kill_process))
        .route("/api/disk", get(system::disks))
        .route("/api/network", get(network::connections))
        .route("/api/network/interfaces", get(network::interfaces))
        .route("/api/network/ping", post(network::ping))
        .route("/api/network/traceroute", post(network::traceroute))
        .route("/api/network/capture/start", post(network::capture_start))
        .route("/api/files/scan", get(files::scan))
        .route("/api/files/browse", get(files::browse))
        .route("/api/files/delete", post(files::delete))
        .route("/api/containers", get(docker::containers))
        .route("/api/containers/{action}", post(docker::container_action))
        .route("/api/docker/images", get(docker::images))
        .route("/api/docker/search", post(docker::search))
        .route("/api/services/vnc/{action}", post(services::vnc))
        .route("/api/services/samba/{action}", post(services::samba))
        .route(
            "/api/services/system/{name}/{action}",
            post(services::system_service),
        )
        .route("/api/tor/status", get(torrents::tor_status))
        .route("/api/tor/start", post(torrents::tor_start))
        .route("/api/tor/stop", post(torrents::tor_stop))
        .route("/api/torrents", get(torrents::list))
        .route("/api/torrents/add", post(torrents::add))
        .route("/api/torrents/{id}/pause", post(torrents::pause))
        .route("/api/torrents/{id}/resume", post(torrents::resume))
        .route("/api/torrents/clear-completed", post(torrents::clear_completed))
        .route("/api/terminal/execute", post(terminal::execute))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
