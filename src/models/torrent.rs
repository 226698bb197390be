// Mock torrent subsystem models

use serde::{Deserialize, Serialize};

/// Torrent lifecycle; serializes to lowercase JSON (e.g. "downloading").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorrentStatus {
    Added,
    Downloading,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub download_path: String,
    pub use_tor: bool,
    pub status: TorrentStatus,
    /// Percent in [0, 100].
    pub progress: f64,
    pub download_speed: String,
    pub size: String,
    pub added_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTorrentRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub download_path: String,
    #[serde(default)]
    pub use_tor: bool,
}
