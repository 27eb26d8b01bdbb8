// Shared test helpers: in-memory data sources and snapshot builders

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Local};
use perfmon::models::{ContainerCounters, ContainerRecord, HostRecord, Snapshot};
use perfmon::sources::{ContainerSource, FetchError, HostSource, Prober};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn counters(status: &str) -> ContainerCounters {
    ContainerCounters {
        cpu_total_usage: 100_000_000,
        precpu_total_usage: 50_000_000,
        system_cpu_usage: 1_000_000_000,
        presystem_cpu_usage: 500_000_000,
        cpu_count: 2,
        memory_usage_bytes: 256 * 1024 * 1024,
        memory_limit_bytes: 1024 * 1024 * 1024,
        status: status.to_string(),
    }
}

/// Containers keyed by name; unknown names are `NotFound`, names in `failing` are `Incomplete`.
#[derive(Default)]
pub struct FakeContainers {
    pub found: HashMap<String, ContainerCounters>,
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeContainers {
    pub fn with(names: &[&str]) -> Self {
        Self {
            found: names
                .iter()
                .map(|n| (n.to_string(), counters("running")))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerSource for FakeContainers {
    async fn get_counters(&self, name: &str) -> Result<ContainerCounters, FetchError> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.failing.contains(name) {
            return Err(FetchError::Incomplete(name.to_string()));
        }
        self.found
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_string()))
    }
}

/// Host source with fixed values. Each call takes `delay` (tokio time), and panics once
/// `panic_after` calls have completed, if set.
#[derive(Default)]
pub struct FakeHost {
    pub calls: AtomicUsize,
    pub panic_after: Option<usize>,
    pub delay: Option<Duration>,
}

impl FakeHost {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostSource for FakeHost {
    async fn host_stats(&self) -> HostRecord {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_after.is_some_and(|limit| n >= limit) {
            panic!("host sampler failed");
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        HostRecord {
            system_cpu_percent: 12.5,
            system_memory_percent: 40.0,
            system_memory_available_gb: 7.25,
            timestamp: Local::now(),
        }
    }
}

/// Probe results per URL; unknown URLs are unhealthy.
#[derive(Default)]
pub struct FakeProber {
    pub healthy: HashSet<String>,
    pub probed: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn healthy(urls: &[&str]) -> Self {
        Self {
            healthy: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str) -> bool {
        self.probed.lock().unwrap().push(url.to_string());
        self.healthy.contains(url)
    }
}

pub fn host(timestamp: DateTime<Local>) -> HostRecord {
    HostRecord {
        system_cpu_percent: 10.0,
        system_memory_percent: 50.0,
        system_memory_available_gb: 8.0,
        timestamp,
    }
}

pub fn record(name: &str, timestamp: DateTime<Local>) -> ContainerRecord {
    ContainerRecord {
        container_name: name.to_string(),
        cpu_percent: 1.5,
        memory_usage_mb: 128.0,
        memory_percent: Some(12.5),
        status: "running".into(),
        timestamp,
        healthy: true,
    }
}

pub fn snapshot(names: &[&str]) -> Snapshot {
    let now = Local::now();
    Snapshot {
        timestamp: now,
        system: host(now),
        containers: names.iter().map(|n| record(n, now)).collect(),
    }
}
