// Integration tests: HTTP endpoints

use axum_test::TestServer;
use std::sync::Arc;
use systempulse::config::AppConfig;
use systempulse::docker_repo::DockerRepo;
use systempulse::net_repo::NetRepo;
use systempulse::routes::{self, AppState};
use systempulse::sysinfo_repo::SysinfoRepo;
use systempulse::torrent_repo::TorrentRepo;

/// Server wired against a tempdir torrent store and a nonexistent docker
/// binary, so container endpoints exercise the degradation path.
async fn test_server(dir: &tempfile::TempDir) -> TestServer {
    let sysinfo_repo = Arc::new(SysinfoRepo::new());
    let system_info = Arc::new(sysinfo_repo.system_info().await.unwrap());
    let state = AppState::new(
        sysinfo_repo,
        Arc::new(NetRepo::new()),
        Arc::new(DockerRepo::with_binary("definitely-not-docker-xyz")),
        Arc::new(TorrentRepo::new(dir.path().join("torrents.json"))),
        system_info,
        AppConfig::default(),
    );
    TestServer::new(routes::app(state)).unwrap()
}

#[tokio::test]
async fn test_dashboard_served_at_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("SystemPulse"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("systempulse")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_system_metrics_shape() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/api/system").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.get("cpu_percent").and_then(|v| v.as_f64()).is_some());
    assert!(json.get("memory_percent").and_then(|v| v.as_f64()).is_some());
    assert!(json.get("disk_percent").and_then(|v| v.as_f64()).is_some());
}

#[tokio::test]
async fn test_system_info_has_identity() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/api/system/info").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.get("hostname").is_some());
    assert!(json.get("os_name").is_some());
    assert!(json.get("logical_cores").and_then(|v| v.as_u64()).is_some());
}

#[tokio::test]
async fn test_processes_capped_at_fifty() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/api/processes").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let records = json.as_array().expect("array of processes");
    assert!(records.len() <= 50);
}

#[tokio::test]
async fn test_disk_listing() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/api/disk").await;
    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>().is_array());
}

#[tokio::test]
async fn test_containers_degrade_without_docker() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.get("/api/containers").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["docker_installed"], false);
    assert_eq!(json["daemon_running"], false);
}

#[tokio::test]
async fn test_unknown_container_action_is_client_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server
        .post("/api/containers/explode")
        .json(&serde_json::json!({ "id": "abc" }))
        .await;
    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert!(json["detail"].as_str().unwrap().contains("explode"));
}

#[tokio::test]
async fn test_delete_partial_failure_is_client_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    // Home-confined: a path outside $HOME fails; nothing is deleted.
    let response = server
        .post("/api/files/delete")
        .json(&serde_json::json!({ "files": ["/definitely/not/a/real/file.txt"] }))
        .await;
    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["deleted_count"], 0);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("/definitely/not/a/real/file.txt")
    );
}

#[tokio::test]
async fn test_delete_rejects_empty_request() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server
        .post("/api/files/delete")
        .json(&serde_json::json!({ "files": [] }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_ping_rejects_hostile_host() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server
        .post("/api/network/ping")
        .json(&serde_json::json!({ "host": "example.com; rm -rf /" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_terminal_executes_shell() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server
        .post("/api/terminal/execute")
        .json(&serde_json::json!({ "command": "echo pulse-check" }))
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], true);
    assert!(json["output"].as_str().unwrap().contains("pulse-check"));
}

#[tokio::test]
async fn test_torrent_lifecycle_over_http() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;

    let added: serde_json::Value = server
        .post("/api/torrents/add")
        .json(&serde_json::json!({ "name": "ubuntu.iso", "url": "magnet:?xt=abc" }))
        .await
        .json();
    let id = added["id"].as_str().unwrap().to_string();
    assert_eq!(added["status"], "added");

    let listed: serde_json::Value = server.get("/api/torrents").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["status"], "downloading");

    let paused: serde_json::Value = server
        .post(&format!("/api/torrents/{}/pause", id))
        .await
        .json();
    assert_eq!(paused["status"], "paused");

    let response = server.post("/api/torrents/missing-id/pause").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_torrent_add_requires_name_and_url() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server
        .post("/api/torrents/add")
        .json(&serde_json::json!({ "name": "", "url": "" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_clear_completed_reports_count() {
    let dir = tempfile::TempDir::new().unwrap();
    let server = test_server(&dir).await;
    let response = server.post("/api/torrents/clear-completed").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["removed"], 0);
}
