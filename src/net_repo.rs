//! Network connection listing via `ss` (fallback `netstat`).
//!
//! The parser is an adapter over a human-readable table: lines that do not
//! parse are skipped explicitly, never fatal.

use crate::command_runner::{self, CommandError};
use crate::models::ConnectionRecord;
use std::time::Duration;

/// Connection listings are capped at this many rows.
pub const MAX_CONNECTIONS: usize = 20;

const LIST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct NetRepo;

impl Default for NetRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl NetRepo {
    pub fn new() -> Self {
        Self
    }

    /// Current TCP/UDP connections, OS order, truncated to
    /// [`MAX_CONNECTIONS`]. A permission refusal degrades to the single
    /// "Access Denied" sentinel row.
    pub async fn connections(&self) -> Result<Vec<ConnectionRecord>, CommandError> {
        let out = match command_runner::run("ss", &["-tuna"], LIST_TIMEOUT).await {
            Ok(out) => out,
            Err(CommandError::ToolMissing(_)) => {
                command_runner::run("netstat", &["-an"], LIST_TIMEOUT).await?
            }
            Err(e) => return Err(e),
        };

        if !out.success && out.output.to_lowercase().contains("permission") {
            return Ok(vec![ConnectionRecord::access_denied()]);
        }

        let mut records: Vec<ConnectionRecord> = out
            .output
            .lines()
            .filter_map(parse_table_line)
            .collect();
        records.truncate(MAX_CONNECTIONS);
        Ok(records)
    }
}

/// Parses one row of `ss -tuna` or `netstat -an` output. Both formats put
/// the protocol first and carry local/peer address columns; anything that
/// does not look like an address pair is dropped.
fn parse_table_line(line: &str) -> Option<ConnectionRecord> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 5 {
        return None;
    }
    let proto = cols[0].to_lowercase();
    if !proto.starts_with("tcp") && !proto.starts_with("udp") {
        return None;
    }

    // ss:      Netid State Recv-Q Send-Q Local Peer
    // netstat: Proto Recv-Q Send-Q Local Foreign [State]
    let (state, local, remote) = if cols[1].chars().all(|c| c.is_ascii_digit()) {
        // netstat layout: no state column for udp rows
        let state = cols.get(5).copied().unwrap_or("-");
        (state, cols[3], cols[4])
    } else {
        if cols.len() < 6 {
            return None;
        }
        (cols[1], cols[4], cols[5])
    };

    if !local.contains(':') && !local.contains('.') {
        return None;
    }

    Some(ConnectionRecord {
        local_address: local.to_string(),
        remote_address: remote.to_string(),
        status: state.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_row() {
        let line = "tcp   ESTAB  0      0      192.168.1.5:44444   93.184.216.34:443";
        let rec = parse_table_line(line).unwrap();
        assert_eq!(rec.local_address, "192.168.1.5:44444");
        assert_eq!(rec.remote_address, "93.184.216.34:443");
        assert_eq!(rec.status, "ESTAB");
    }

    #[test]
    fn test_parse_ss_udp_row() {
        let line = "udp   UNCONN 0      0      0.0.0.0:68          0.0.0.0:*";
        let rec = parse_table_line(line).unwrap();
        assert_eq!(rec.status, "UNCONN");
    }

    #[test]
    fn test_parse_netstat_row() {
        let line = "tcp        0      0 127.0.0.1:631           0.0.0.0:*               LISTEN";
        let rec = parse_table_line(line).unwrap();
        assert_eq!(rec.local_address, "127.0.0.1:631");
        assert_eq!(rec.status, "LISTEN");
    }

    #[test]
    fn test_header_and_garbage_rows_skipped() {
        assert!(parse_table_line("Netid State  Recv-Q Send-Q Local Address:Port Peer").is_none());
        assert!(parse_table_line("Active Internet connections (servers)").is_none());
        assert!(parse_table_line("").is_none());
    }
}
