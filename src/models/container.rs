// Docker container models: raw counters from the stats API and the derived per-tick record

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Limits at or above this are cgroup "no limit" sentinels rather than real ceilings.
pub const UNLIMITED_MEMORY_BYTES: u64 = 1 << 62;

/// Raw counters from one Docker stats read. Docker reports both the current and the
/// previous CPU sample in a single response, so one read is enough to derive a rate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerCounters {
    pub cpu_total_usage: u64,
    pub precpu_total_usage: u64,
    pub system_cpu_usage: u64,
    pub presystem_cpu_usage: u64,
    pub cpu_count: u32,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    /// Docker lifecycle status (e.g. "running", "paused").
    pub status: String,
}

/// Per-target metrics for one tick. Only produced when the stats read succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub container_name: String,
    pub cpu_percent: f64,
    pub memory_usage_mb: f64,
    /// `None` when the container has no memory ceiling.
    pub memory_percent: Option<f64>,
    pub status: String,
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub healthy: bool,
}
