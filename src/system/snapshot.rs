use serde::Serialize;

use super::delta::usage_percent;
use super::process::ProcessSample;

/// Metrics that can drop out of a snapshot when their source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
    Network,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Usage {
    pub used_kb: u64,
    pub total_kb: u64,
    pub percent: f64,
}

impl Usage {
    pub fn new(used_kb: u64, total_kb: u64) -> Self {
        Usage {
            used_kb,
            total_kb,
            percent: usage_percent(used_kb, total_kb),
        }
    }

    pub fn used_mb(&self) -> u64 {
        self.used_kb / 1024
    }

    pub fn total_mb(&self) -> u64 {
        self.total_kb / 1024
    }

    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkRate {
    pub rx_bytes_per_sec: u64,
    pub tx_bytes_per_sec: u64,
}

/// Result of one sampling cycle. Built whole by the collector and never
/// modified afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub cpu_usage_percent: f64,
    pub memory: Usage,
    pub disk: Usage,
    pub disk_mount_point: String,
    pub network: NetworkRate,
    pub top_processes: Vec<ProcessSample>,
    /// Metrics reported as zero because their source could not be read.
    pub unavailable: Vec<Metric>,
}

impl Snapshot {
    pub fn is_available(&self, metric: Metric) -> bool {
        !self.unavailable.contains(&metric)
    }
}
