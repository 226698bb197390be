use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use systempulse::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let args = cli::Cli::parse();

    // Scan-and-exit mode: report availability for a port range.
    if let Some(range) = &args.scan_ports {
        let (start, end) = cli::parse_port_range(range)?;
        ports::scan_report(start, end, &mut std::io::stdout())?;
        return Ok(());
    }

    let mut app_config = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("read {}: {}", path, e))?;
            config::AppConfig::load_from_str(&s)?
        }
        None => config::AppConfig::load()?,
    };
    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = &args.host {
        app_config.server.host = host.clone();
    }

    if app_config.scaffold.enabled {
        scaffold::setup_if_needed(std::path::Path::new(&app_config.scaffold.root))?;
    }

    let mode = if args.kill_port {
        ports::PortMode::Force
    } else if args.auto_port {
        ports::PortMode::Auto
    } else {
        ports::PortMode::Interactive
    };
    let opts = ports::NegotiatorOptions {
        max_attempts: app_config.server.port_attempts,
        grace: std::time::Duration::from_secs(app_config.server.kill_grace_secs),
    };
    let port = match ports::negotiate(
        app_config.server.port,
        mode,
        &opts,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
    ) {
        ports::Negotiation::Resolved(port) => port,
        ports::Negotiation::Aborted(reason) => {
            anyhow::bail!("port negotiation failed: {}", reason);
        }
    };

    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new());
    let system_info = Arc::new(
        sysinfo_repo
            .system_info()
            .await
            .map_err(|e| anyhow::anyhow!("system info: {}", e))?,
    );
    let net_repo = Arc::new(net_repo::NetRepo::new());
    let docker_repo = Arc::new(docker_repo::DockerRepo::new());
    let torrent_repo = Arc::new(torrent_repo::TorrentRepo::new(
        app_config.torrents.state_path.clone(),
    ));

    let state = routes::AppState::new(
        sysinfo_repo,
        net_repo,
        docker_repo,
        torrent_repo,
        system_info,
        app_config.clone(),
    );
    let app = routes::app(state);

    let addr = format!("{}:{}", app_config.server.host, port);
    // The negotiator confirmed the port moments ago; another process can
    // still win the race, in which case this bind fails like any other.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    Ok(())
}
