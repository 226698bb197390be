// File scan and browse models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    /// Last modification time, RFC 3339; empty when the filesystem gives none.
    pub modified: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: String,
}

/// Outcome of a multi-file delete. Successes stand even when other paths
/// fail; failures are reported together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReport {
    pub deleted_count: usize,
    pub failed: Vec<String>,
    pub message: String,
}
