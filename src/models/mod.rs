// Wire records for the HTTP surface

mod docker;
mod files;
mod network;
mod system;
mod torrent;

pub use docker::{
    ContainerListResponse, ContainerRecord, ImageListResponse, ImageRecord, SearchRecord,
    SearchResponse,
};
pub use files::{BrowseEntry, DeleteReport, FileEntry};
pub use network::ConnectionRecord;
pub use system::{
    DiskPartition, InterfaceRecord, MetricsSnapshot, ProcessRecord, SystemInfo, top_by_cpu,
};
pub use torrent::{AddTorrentRequest, TorrentRecord, TorrentStatus};
