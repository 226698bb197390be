//! Command-line arguments for the SystemPulse server.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "systempulse")]
#[command(author, version, about = "Host telemetry dashboard and OS control panel")]
pub struct Cli {
    /// Preferred port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind host
    #[arg(long)]
    pub host: Option<String>,

    /// On a port conflict, pick the next free port automatically
    #[arg(long)]
    pub auto_port: bool,

    /// On a port conflict, kill the occupying process and reuse the port
    #[arg(long)]
    pub kill_port: bool,

    /// Scan a port range for availability and exit (e.g. 8000-8100)
    #[arg(long, value_name = "START-END")]
    pub scan_ports: Option<String>,

    /// Config file path (overrides the CONFIG_FILE env var)
    #[arg(long)]
    pub config: Option<String>,
}

/// Parses a `START-END` range argument. Both bounds inclusive.
pub fn parse_port_range(s: &str) -> anyhow::Result<(u16, u16)> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("expected START-END, got {:?}", s))?;
    let start: u16 = start
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid start port {:?}", start))?;
    let end: u16 = end
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid end port {:?}", end))?;
    anyhow::ensure!(start > 0, "start port must be > 0");
    anyhow::ensure!(start <= end, "start port {} exceeds end port {}", start, end);
    Ok((start, end))
}
