// Host-level CPU and memory record

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    pub system_cpu_percent: f64,
    pub system_memory_percent: f64,
    pub system_memory_available_gb: f64,
    pub timestamp: DateTime<Local>,
}

impl HostRecord {
    /// Zeroed record, used only when the sampler itself could not run.
    pub fn unavailable(timestamp: DateTime<Local>) -> Self {
        Self {
            system_cpu_percent: 0.0,
            system_memory_percent: 0.0,
            system_memory_available_gb: 0.0,
            timestamp,
        }
    }
}
