//! Mock torrent subsystem and Tor process control.
//!
//! Not a download engine: state lives in one flat JSON file and progress
//! advances by random jitter on every list call. The read-modify-write has
//! no locking; concurrent lists can lose a tick (documented, acceptable
//! for a mock).

use crate::command_runner::{self, CommandError, CommandOutput};
use crate::models::{AddTorrentRequest, TorrentRecord, TorrentStatus};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const TOR_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TorrentError {
    #[error("torrent state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("torrent state file is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    #[error("no torrent with id {0}")]
    NotFound(String),
}

pub struct TorrentRepo {
    state_path: PathBuf,
}

impl TorrentRepo {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    fn load(&self) -> Result<Vec<TorrentRecord>, TorrentError> {
        match std::fs::read_to_string(&self.state_path) {
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, records: &[TorrentRecord]) -> Result<(), TorrentError> {
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.state_path, json)?;
        Ok(())
    }

    pub fn add(&self, req: AddTorrentRequest) -> Result<TorrentRecord, TorrentError> {
        let mut records = self.load()?;
        let record = TorrentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: req.name,
            url: req.url,
            download_path: if req.download_path.is_empty() {
                "~/Downloads".into()
            } else {
                req.download_path
            },
            use_tor: req.use_tor,
            status: TorrentStatus::Added,
            progress: 0.0,
            download_speed: "0 KB/s".into(),
            size: format!("{} MB", rand::thread_rng().gen_range(50..4000)),
            added_time: chrono::Local::now().to_rfc3339(),
        };
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Listing doubles as the fake scheduler tick: active records gain
    /// random progress, complete at 100, and get a randomized speed.
    pub fn list_and_tick(&self) -> Result<Vec<TorrentRecord>, TorrentError> {
        let mut records = self.load()?;
        let mut rng = rand::thread_rng();
        for record in &mut records {
            match record.status {
                TorrentStatus::Paused | TorrentStatus::Completed => continue,
                TorrentStatus::Added => record.status = TorrentStatus::Downloading,
                TorrentStatus::Downloading => {}
            }
            record.progress = (record.progress + rng.gen_range(1.0..10.0)).min(100.0);
            if record.progress >= 100.0 {
                record.progress = 100.0;
                record.status = TorrentStatus::Completed;
                record.download_speed = "0 KB/s".into();
            } else {
                record.download_speed = format!("{:.1} MB/s", rng.gen_range(0.3..8.0));
            }
        }
        self.save(&records)?;
        Ok(records)
    }

    pub fn pause(&self, id: &str) -> Result<TorrentRecord, TorrentError> {
        self.update(id, |r| {
            if r.status != TorrentStatus::Completed {
                r.status = TorrentStatus::Paused;
                r.download_speed = "0 KB/s".into();
            }
        })
    }

    pub fn resume(&self, id: &str) -> Result<TorrentRecord, TorrentError> {
        self.update(id, |r| {
            if r.status == TorrentStatus::Paused {
                r.status = TorrentStatus::Downloading;
            }
        })
    }

    fn update(
        &self,
        id: &str,
        f: impl FnOnce(&mut TorrentRecord),
    ) -> Result<TorrentRecord, TorrentError> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TorrentError::NotFound(id.to_string()))?;
        f(record);
        let updated = record.clone();
        self.save(&records)?;
        Ok(updated)
    }

    /// Removes completed records; returns how many were dropped.
    pub fn clear_completed(&self) -> Result<usize, TorrentError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.status != TorrentStatus::Completed);
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }
}

/// True when a tor process is running (`pgrep -x tor`).
pub async fn tor_status() -> Result<bool, CommandError> {
    let out = command_runner::run("pgrep", &["-x", "tor"], TOR_TIMEOUT).await?;
    Ok(out.success)
}

/// Spawns the tor daemon detached; the child is not awaited.
pub async fn tor_start() -> Result<String, CommandError> {
    match tokio::process::Command::new("tor").spawn() {
        Ok(_child) => Ok("tor starting".into()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CommandError::ToolMissing("tor".into()))
        }
        Err(e) => Err(CommandError::Io {
            program: "tor".into(),
            source: e,
        }),
    }
}

pub async fn tor_stop() -> Result<CommandOutput, CommandError> {
    command_runner::run("pkill", &["-x", "tor"], TOR_TIMEOUT).await
}
