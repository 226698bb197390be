// Docker CLI records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub image: String,
    pub name: String,
    pub status: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub repository: String,
    pub tag: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub name: String,
    pub description: String,
    pub stars: u64,
    pub official: bool,
}

/// Listing response that degrades instead of failing: a missing CLI or a
/// down daemon is reported in-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerListResponse {
    pub docker_installed: bool,
    pub daemon_running: bool,
    pub containers: Vec<ContainerRecord>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub docker_installed: bool,
    pub daemon_running: bool,
    pub images: Vec<ImageRecord>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub docker_installed: bool,
    pub results: Vec<SearchRecord>,
    pub message: String,
}
