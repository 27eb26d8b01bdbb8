// One sampling tick: host stats once, then each target in order (stats, then probe).

use crate::docker_repo::{cpu_percent, memory_percent};
use crate::models::{ContainerCounters, ContainerRecord, Snapshot, Target, bytes_to_mb};
use crate::series_store::SeriesStore;
use crate::sources::{ContainerSource, FetchError, HostSource, Prober};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Build a record from raw counters. `healthy` starts false; the collector sets it after probing.
pub fn container_record(
    name: &str,
    counters: &ContainerCounters,
    timestamp: DateTime<Local>,
) -> ContainerRecord {
    ContainerRecord {
        container_name: name.to_string(),
        cpu_percent: cpu_percent(
            counters.cpu_total_usage,
            counters.precpu_total_usage,
            counters.system_cpu_usage,
            counters.presystem_cpu_usage,
            counters.cpu_count,
        ),
        memory_usage_mb: bytes_to_mb(counters.memory_usage_bytes),
        memory_percent: memory_percent(counters.memory_usage_bytes, counters.memory_limit_bytes),
        status: counters.status.clone(),
        timestamp,
        healthy: false,
    }
}

pub struct Collector {
    targets: Vec<Target>,
    containers: Arc<dyn ContainerSource>,
    host: Arc<dyn HostSource>,
    prober: Arc<dyn Prober>,
    store: Arc<SeriesStore>,
}

impl Collector {
    pub fn new(
        targets: Vec<Target>,
        containers: Arc<dyn ContainerSource>,
        host: Arc<dyn HostSource>,
        prober: Arc<dyn Prober>,
        store: Arc<SeriesStore>,
    ) -> Self {
        Self {
            targets,
            containers,
            host,
            prober,
            store,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn store(&self) -> &Arc<SeriesStore> {
        &self.store
    }

    /// Stats for one target, or `None` (logged) if it cannot be read this tick.
    async fn fetch_target(&self, target: &Target) -> Option<ContainerRecord> {
        match self.containers.get_counters(&target.name).await {
            Ok(counters) => Some(container_record(&target.name, &counters, Local::now())),
            Err(FetchError::NotFound(name)) => {
                tracing::warn!(container = %name, "Container not found");
                None
            }
            Err(e) => {
                tracing::error!(
                    container = %target.name,
                    error = %e,
                    operation = "get_counters",
                    "Error getting container stats"
                );
                None
            }
        }
    }

    /// Run one tick and append the snapshot. Nothing is appended if the future is dropped early.
    pub async fn collect_metrics(&self) -> Snapshot {
        let timestamp = Local::now();
        let system = self.host.host_stats().await;

        let mut containers = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            if let Some(mut record) = self.fetch_target(target).await {
                record.healthy = self.prober.probe(&target.url).await;
                containers.push(record);
            }
        }

        let snapshot = Snapshot {
            timestamp,
            system,
            containers,
        };
        self.store.append(snapshot.clone());

        tracing::info!(
            timestamp = %snapshot.timestamp.to_rfc3339(),
            system_cpu_percent = snapshot.system.system_cpu_percent,
            system_memory_percent = snapshot.system.system_memory_percent,
            containers = snapshot.containers.len(),
            "Collected metrics"
        );
        for c in &snapshot.containers {
            tracing::info!(
                "{}: CPU: {}%, Memory: {}MB ({}), Healthy: {}",
                c.container_name,
                c.cpu_percent,
                c.memory_usage_mb,
                c.memory_percent
                    .map_or_else(|| "unlimited".to_string(), |p| format!("{p}%")),
                c.healthy
            );
        }
        snapshot
    }
}
