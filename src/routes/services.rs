// Service manager handlers (systemctl / launchctl)

use axum::extract::Path;
use axum::response::Response;

use super::{ApiError, delegate_response};
use crate::command_runner::validate_plain_arg;
use crate::services::{self, ServiceAction};

fn parse_action(action: &str) -> Result<ServiceAction, ApiError> {
    ServiceAction::parse(action)
        .ok_or_else(|| ApiError::bad_request(format!("unknown service action {:?}", action)))
}

/// POST /api/services/vnc/{start|stop|status}
pub(super) async fn vnc(Path(action): Path<String>) -> Result<Response, ApiError> {
    let action = parse_action(&action)?;
    Ok(delegate_response(
        services::control(services::vnc_unit(), action).await,
    ))
}

/// POST /api/services/samba/{start|stop|status}
pub(super) async fn samba(Path(action): Path<String>) -> Result<Response, ApiError> {
    let action = parse_action(&action)?;
    Ok(delegate_response(
        services::control(services::samba_unit(), action).await,
    ))
}

/// POST /api/services/system/{name}/{action} — arbitrary named unit.
pub(super) async fn system_service(
    Path((name, action)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    validate_plain_arg(&name).map_err(ApiError::bad_request)?;
    let action = parse_action(&action)?;
    Ok(delegate_response(services::control(&name, action).await))
}
