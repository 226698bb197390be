// System stats via sysinfo

use crate::models::{
    DiskPartition, InterfaceRecord, MetricsSnapshot, ProcessRecord, SystemInfo, top_by_cpu,
};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Disks, Networks, Pid, ProcessesToUpdate, System};
use tracing::instrument;

/// Listing caps; every endpoint applies them deterministically.
pub const MAX_PROCESSES: usize = 50;

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    last_cpu_refresh: Arc<std::sync::Mutex<Option<(Instant, f64)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// CPU/memory/disk percentages, read fresh for every request.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "metrics_snapshot"))]
    pub async fn metrics_snapshot(&self) -> anyhow::Result<MetricsSnapshot> {
        let sys = self.sys.clone();
        let disks = self.disks.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            // sysinfo needs a delay between CPU refreshes for a meaningful
            // delta; cache the last reading when polled faster than that.
            let now = Instant::now();
            let cpu_percent = if let Ok(mut guard) = last_cpu_refresh.lock() {
                match *guard {
                    Some((prev_ts, prev_usage))
                        if now.duration_since(prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL =>
                    {
                        prev_usage
                    }
                    Some(_) => {
                        sys.refresh_cpu_all();
                        let usage = sys.global_cpu_usage() as f64;
                        *guard = Some((now, usage));
                        usage
                    }
                    None => {
                        sys.refresh_cpu_all();
                        *guard = Some((now, 0.0));
                        0.0
                    }
                }
            } else {
                sys.refresh_cpu_all();
                0.0
            };

            sys.refresh_memory();
            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            let memory_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(false);
            let disk_percent = disks_guard
                .list()
                .iter()
                .find(|d| d.mount_point() == std::path::Path::new("/"))
                .or_else(|| disks_guard.list().first())
                .map(|d| {
                    let total = d.total_space();
                    let used = total.saturating_sub(d.available_space());
                    if total > 0 {
                        (used as f64 / total as f64) * 100.0
                    } else {
                        0.0
                    }
                })
                .unwrap_or(0.0);

            Ok(MetricsSnapshot {
                cpu_percent: cpu_percent.clamp(0.0, 100.0),
                memory_percent,
                disk_percent,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Top processes by CPU, capped at [`MAX_PROCESSES`].
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "processes"))]
    pub async fn processes(&self) -> anyhow::Result<Vec<ProcessRecord>> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_processes(ProcessesToUpdate::All, true);
            let total_memory = sys.total_memory();
            let records: Vec<ProcessRecord> = sys
                .processes()
                .iter()
                .map(|(pid, p)| ProcessRecord {
                    pid: pid.as_u32(),
                    name: p.name().to_string_lossy().into_owned(),
                    cpu_percent: p.cpu_usage() as f64,
                    memory_percent: if total_memory > 0 {
                        (p.memory() as f64 / total_memory as f64) * 100.0
                    } else {
                        0.0
                    },
                })
                .collect();
            Ok(top_by_cpu(records, MAX_PROCESSES))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Sends a kill signal. Returns false when the pid is gone or the
    /// signal was refused.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "kill_process"))]
    pub async fn kill_process(&self, pid: u32) -> anyhow::Result<bool> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
            Ok(sys
                .process(Pid::from_u32(pid))
                .map(|p| p.kill())
                .unwrap_or(false))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disks"))]
    pub async fn disks(&self) -> anyhow::Result<Vec<DiskPartition>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(false);
            let partitions = disks_guard
                .list()
                .iter()
                .map(|d| {
                    let total = d.total_space();
                    let available = d.available_space();
                    let used = total.saturating_sub(available);
                    DiskPartition {
                        mount: d.mount_point().to_string_lossy().into_owned(),
                        name: d.name().to_string_lossy().into_owned(),
                        fs_type: d.file_system().to_string_lossy().into_owned(),
                        total,
                        used,
                        available,
                        usage_percent: if total > 0 {
                            (used as f64 / total as f64) * 100.0
                        } else {
                            0.0
                        },
                    }
                })
                .collect();
            Ok(partitions)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interfaces"))]
    pub async fn interfaces(&self) -> anyhow::Result<Vec<InterfaceRecord>> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let mut interfaces: Vec<InterfaceRecord> = networks_guard
                .list()
                .iter()
                .map(|(name, data)| InterfaceRecord {
                    name: name.clone(),
                    mac_address: data.mac_address().to_string(),
                    ipv4: data
                        .ip_networks()
                        .iter()
                        .filter(|n| n.addr.is_ipv4())
                        .map(|n| n.addr.to_string())
                        .collect(),
                    ipv6: data
                        .ip_networks()
                        .iter()
                        .filter(|n| n.addr.is_ipv6())
                        .map(|n| n.addr.to_string())
                        .collect(),
                    bytes_sent: data.total_transmitted(),
                    bytes_recv: data.total_received(),
                    packets_sent: data.total_packets_transmitted(),
                    packets_recv: data.total_packets_received(),
                })
                .collect();
            interfaces.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(interfaces)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Static host identity, fetched once at startup.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "system_info"))]
    pub async fn system_info(&self) -> anyhow::Result<SystemInfo> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            let cpu_model = sys
                .cpus()
                .first()
                .map(|c| c.brand().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown".into());
            Ok(SystemInfo {
                hostname: System::host_name().unwrap_or_default(),
                os_name: System::name().unwrap_or_else(|| std::env::consts::OS.into()),
                os_version: System::os_version().unwrap_or_default(),
                kernel_version: System::kernel_version().unwrap_or_default(),
                arch: std::env::consts::ARCH.into(),
                cpu_model,
                physical_cores: System::physical_core_count().unwrap_or(0) as u32,
                logical_cores: sys.cpus().len() as u32,
                total_memory: sys.total_memory(),
                uptime_secs: System::uptime(),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
