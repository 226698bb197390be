//! Port probing and startup port negotiation.
//!
//! Runs before the server binds, so everything here is synchronous. The
//! negotiator resolves a usable port from the preferred one: pick the next
//! free port, kill the occupant and reuse, or ask the operator.

use std::io::{BufRead, Write};
use std::net::TcpListener;
use std::process::Command;
use std::time::Duration;

/// Checks whether a TCP port is bound on loopback. The probe listener is
/// dropped immediately on success. Bind errors other than AddrInUse are
/// treated as "in use" so startup never proceeds on a guess.
pub fn is_port_in_use(port: u16) -> bool {
    match TcpListener::bind(("127.0.0.1", port)) {
        Ok(listener) => {
            drop(listener);
            false
        }
        Err(_) => true,
    }
}

#[derive(Debug, Clone)]
pub struct PortOwner {
    pub pid: u32,
    pub process_name: String,
}

/// Looks up the process holding a port via `lsof -ti tcp:<port>` plus a
/// `ps` name lookup. None when lsof is unavailable, fails, or the port is
/// free. lsof exits 1 when nothing matches; that is not an error.
pub fn owner_of(port: u16) -> Option<PortOwner> {
    let output = Command::new("lsof")
        .args(["-ti", &format!("tcp:{}", port)])
        .output()
        .ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pid: u32 = stdout.lines().next()?.trim().parse().ok()?;
    let process_name = process_name(pid).unwrap_or_else(|| "unknown".into());
    Some(PortOwner { pid, process_name })
}

fn process_name(pid: u32) -> Option<String> {
    let output = Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output()
        .ok()?;
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// Sends SIGKILL. Returns whether the signal was accepted; the process may
/// still be exiting, so callers must re-probe the port afterwards.
pub fn kill(pid: u32) -> bool {
    Command::new("kill")
        .args(["-9", &pid.to_string()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// First free port in `(preferred, preferred + max_attempts]`, ascending.
pub fn find_free_port(preferred: u16, max_attempts: u16) -> Option<u16> {
    (1..=max_attempts)
        .filter_map(|offset| preferred.checked_add(offset))
        .find(|&candidate| !is_port_in_use(candidate))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMode {
    /// Scan upward from the preferred port for the first free one.
    Auto,
    /// Kill the occupant, wait, re-probe.
    Force,
    /// Menu loop on the given reader/writer.
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    Resolved(u16),
    Aborted(String),
}

#[derive(Debug, Clone)]
pub struct NegotiatorOptions {
    pub max_attempts: u16,
    /// Wait after a kill before re-probing; killing frees the port
    /// asynchronously.
    pub grace: Duration,
}

impl Default for NegotiatorOptions {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            grace: Duration::from_secs(1),
        }
    }
}

/// Resolves a bindable port or aborts. A port is only ever resolved right
/// after a probe confirmed it free; the window between that probe and the
/// real bind is an accepted race (the bind failure is handled by the
/// caller as a normal error, not an assertion).
pub fn negotiate<R: BufRead, W: Write>(
    preferred: u16,
    mode: PortMode,
    opts: &NegotiatorOptions,
    reader: &mut R,
    writer: &mut W,
) -> Negotiation {
    if !is_port_in_use(preferred) {
        return Negotiation::Resolved(preferred);
    }

    match mode {
        PortMode::Auto => match find_free_port(preferred, opts.max_attempts) {
            Some(port) => {
                tracing::info!(preferred, port, "port in use; auto-selected another");
                Negotiation::Resolved(port)
            }
            None => Negotiation::Aborted(format!(
                "no free port in {}-{}",
                preferred.saturating_add(1),
                preferred.saturating_add(opts.max_attempts)
            )),
        },
        PortMode::Force => kill_and_reprobe(preferred, opts),
        PortMode::Interactive => prompt_loop(preferred, opts, reader, writer),
    }
}

fn kill_and_reprobe(port: u16, opts: &NegotiatorOptions) -> Negotiation {
    let owner = match owner_of(port) {
        Some(o) => o,
        None => {
            return Negotiation::Aborted(format!(
                "port {} is in use but its owner could not be determined",
                port
            ));
        }
    };
    tracing::info!(port, pid = owner.pid, name = %owner.process_name, "killing port occupant");
    if !kill(owner.pid) {
        return Negotiation::Aborted(format!(
            "failed to kill {} (pid {})",
            owner.process_name, owner.pid
        ));
    }
    std::thread::sleep(opts.grace);
    if is_port_in_use(port) {
        Negotiation::Aborted(format!("port {} still in use after killing occupant", port))
    } else {
        Negotiation::Resolved(port)
    }
}

fn prompt_loop<R: BufRead, W: Write>(
    port: u16,
    opts: &NegotiatorOptions,
    reader: &mut R,
    writer: &mut W,
) -> Negotiation {
    loop {
        let owner_desc = owner_of(port)
            .map(|o| format!("{} (pid {})", o.process_name, o.pid))
            .unwrap_or_else(|| "an unknown process".into());
        let _ = writeln!(writer, "Port {} is in use by {}.", port, owner_desc);
        let _ = writeln!(writer, "  1) find another port");
        let _ = writeln!(writer, "  2) kill it and reuse port {}", port);
        let _ = writeln!(writer, "  3) abort");
        let _ = write!(writer, "> ");
        let _ = writer.flush();

        let choice = match read_line(reader) {
            Some(line) => line,
            None => return Negotiation::Aborted("input closed".into()),
        };

        match choice.trim() {
            "1" => match find_free_port(port, opts.max_attempts) {
                Some(found) => {
                    let _ = writeln!(writer, "Using port {}.", found);
                    return Negotiation::Resolved(found);
                }
                None => {
                    let _ = writeln!(writer, "No free port found nearby.");
                }
            },
            "2" => {
                let _ = write!(writer, "Kill {}? [y/N] ", owner_desc);
                let _ = writer.flush();
                let confirm = match read_line(reader) {
                    Some(line) => line,
                    None => return Negotiation::Aborted("input closed".into()),
                };
                if !confirm.trim().eq_ignore_ascii_case("y") {
                    continue;
                }
                match kill_and_reprobe(port, opts) {
                    Negotiation::Resolved(p) => return Negotiation::Resolved(p),
                    Negotiation::Aborted(reason) => {
                        let _ = writeln!(writer, "{}", reason);
                    }
                }
            }
            "3" => return Negotiation::Aborted("aborted by user".into()),
            other => {
                let _ = writeln!(writer, "Unrecognized choice {:?}.", other);
            }
        }
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

/// Prints availability for every port in the inclusive range.
pub fn scan_report<W: Write>(start: u16, end: u16, writer: &mut W) -> std::io::Result<()> {
    for port in start..=end {
        let state = if is_port_in_use(port) {
            "in use"
        } else {
            "free"
        };
        writeln!(writer, "{:>5}  {}", port, state)?;
    }
    Ok(())
}
