use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub torrents: TorrentConfig,
    #[serde(default)]
    pub scaffold: ScaffoldConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Ports tried above the preferred one when --auto-port is set.
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,
    /// Seconds to wait after killing a port's owner before re-probing.
    #[serde(default = "default_kill_grace_secs")]
    pub kill_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Files below this size are ignored by the large-file scan.
    #[serde(default = "default_min_file_size")]
    pub min_file_size_bytes: u64,
    /// Levels below each recursive root before the walker prunes.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TorrentConfig {
    #[serde(default = "default_torrent_state_path")]
    pub state_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default = "default_scaffold_root")]
    pub root: String,
    #[serde(default = "default_scaffold_enabled")]
    pub enabled: bool,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port_attempts() -> u16 {
    100
}

fn default_kill_grace_secs() -> u64 {
    1
}

fn default_min_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_max_depth() -> usize {
    3
}

fn default_max_results() -> usize {
    50
}

fn default_torrent_state_path() -> String {
    "torrents.json".into()
}

fn default_scaffold_root() -> String {
    "systempulse".into()
}

fn default_scaffold_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            port_attempts: default_port_attempts(),
            kill_grace_secs: default_kill_grace_secs(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_file_size_bytes: default_min_file_size(),
            max_depth: default_max_depth(),
            max_results: default_max_results(),
        }
    }
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            state_path: default_torrent_state_path(),
        }
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            root: default_scaffold_root(),
            enabled: default_scaffold_enabled(),
        }
    }
}

impl AppConfig {
    /// Loads config from CONFIG_FILE (default: config.toml). A missing file
    /// yields the defaults; a present but invalid file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!("read {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.server.port_attempts > 0,
            "server.port_attempts must be > 0, got {}",
            self.server.port_attempts
        );
        anyhow::ensure!(
            self.scan.max_depth > 0,
            "scan.max_depth must be > 0, got {}",
            self.scan.max_depth
        );
        anyhow::ensure!(
            self.scan.max_results > 0,
            "scan.max_results must be > 0, got {}",
            self.scan.max_results
        );
        anyhow::ensure!(
            !self.torrents.state_path.is_empty(),
            "torrents.state_path must be non-empty"
        );
        anyhow::ensure!(
            !self.scaffold.root.is_empty(),
            "scaffold.root must be non-empty"
        );
        Ok(())
    }
}
