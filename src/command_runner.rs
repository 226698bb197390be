//! Bounded-timeout subprocess delegation.
//!
//! Every "tool" endpoint (ping, traceroute, docker, service managers, the
//! terminal) funnels through here: run the external program, capture
//! combined stdout/stderr, relay it verbatim with the exit status.

use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The executable could not be found on PATH.
    #[error("{0} is not installed or not on PATH")]
    ToolMissing(String),

    /// The process did not finish within the configured timeout.
    #[error("{program} timed out after {timeout_secs}s")]
    TimedOut { program: String, timeout_secs: u64 },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// stdout followed by stderr, exactly as the tool produced them.
    pub output: String,
}

/// Runs `program args..` with a timeout, capturing combined output.
/// Arguments are passed as argv; nothing goes through a shell here.
pub async fn run(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput, CommandError> {
    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);
    run_command(cmd, program, timeout).await
}

/// Runs a raw shell command via `sh -c`. The caller-supplied string is
/// executed with the server's privileges; there is no allow-list. Only the
/// terminal endpoint uses this.
pub async fn run_shell(command: &str, timeout: Duration) -> Result<CommandOutput, CommandError> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).kill_on_drop(true);
    run_command(cmd, "sh", timeout).await
}

async fn run_command(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> Result<CommandOutput, CommandError> {
    let fut = cmd.output();
    let output = match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CommandError::ToolMissing(program.to_string()));
        }
        Ok(Err(e)) => {
            return Err(CommandError::Io {
                program: program.to_string(),
                source: e,
            });
        }
        Err(_) => {
            return Err(CommandError::TimedOut {
                program: program.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    Ok(CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        output: text,
    })
}

/// Rejects inputs that only make sense as shell injection. Hostnames,
/// interface names and service names are passed as argv, but a value full
/// of metacharacters is a client error either way.
pub fn validate_plain_arg(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("value must be non-empty".into());
    }
    if value
        .chars()
        .any(|c| matches!(c, ';' | '|' | '&' | '$' | '`' | '<' | '>' | '\n' | '\r'))
    {
        return Err(format!("invalid characters in {:?}", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plain_arg() {
        assert!(validate_plain_arg("example.com").is_ok());
        assert!(validate_plain_arg("eth0").is_ok());
        assert!(validate_plain_arg("10.0.0.1").is_ok());
        assert!(validate_plain_arg("").is_err());
        assert!(validate_plain_arg("   ").is_err());
        assert!(validate_plain_arg("host; rm -rf /").is_err());
        assert!(validate_plain_arg("a|b").is_err());
        assert!(validate_plain_arg("$(whoami)").is_err());
    }
}
