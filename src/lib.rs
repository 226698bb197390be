// Library for tests to access modules

pub mod cli;
pub mod command_runner;
pub mod config;
pub mod docker_repo;
pub mod fs_scan;
pub mod models;
pub mod net_repo;
pub mod ports;
pub mod routes;
pub mod scaffold;
pub mod services;
pub mod sysinfo_repo;
pub mod torrent_repo;
pub mod version;
