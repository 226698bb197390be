//! Platform service control (systemctl / launchctl).

use crate::command_runner::{self, CommandError, CommandOutput};
use std::time::Duration;

const SERVICE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Status,
}

impl ServiceAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Unit name for the VNC convenience endpoints on this platform.
pub fn vnc_unit() -> &'static str {
    if cfg!(target_os = "macos") {
        "com.apple.screensharing"
    } else {
        "x11vnc"
    }
}

/// Unit name for the Samba convenience endpoints on this platform.
pub fn samba_unit() -> &'static str {
    if cfg!(target_os = "macos") {
        "com.apple.smbd"
    } else {
        "smbd"
    }
}

/// Drives the host's service manager. Behavior diverges by OS on purpose:
/// systemctl on Linux, launchctl on macOS, a descriptive refusal elsewhere.
pub async fn control(unit: &str, action: ServiceAction) -> Result<CommandOutput, CommandError> {
    #[cfg(target_os = "linux")]
    {
        let verb = match action {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Status => "status",
        };
        let args: Vec<&str> = match action {
            ServiceAction::Status => vec![verb, "--no-pager", unit],
            _ => vec![verb, unit],
        };
        command_runner::run("systemctl", &args, SERVICE_TIMEOUT).await
    }

    #[cfg(target_os = "macos")]
    {
        let args: Vec<&str> = match action {
            ServiceAction::Start => vec!["start", unit],
            ServiceAction::Stop => vec!["stop", unit],
            ServiceAction::Status => vec!["list", unit],
        };
        command_runner::run("launchctl", &args, SERVICE_TIMEOUT).await
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (unit, action);
        Ok(CommandOutput {
            success: false,
            exit_code: None,
            output: "service control is not supported on this platform".into(),
        })
    }
}
