//! Seams between the sampling loop and its data sources.
//!
//! The collector only talks to these traits, so the Docker, sysinfo and HTTP backends can be
//! swapped for in-memory fakes in tests.

use crate::models::{ContainerCounters, HostRecord};
use async_trait::async_trait;

/// Why a target produced no record this tick. Never fatal: the target is omitted from the
/// snapshot and tried again on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("container {0} not found")]
    NotFound(String),
    #[error("stats for container {0} are missing cpu or precpu blocks")]
    Incomplete(String),
    #[error("docker api: {0}")]
    Docker(#[from] bollard::errors::Error),
}

/// Container runtime counters, one read per call.
#[async_trait]
pub trait ContainerSource: Send + Sync {
    async fn get_counters(&self, name: &str) -> Result<ContainerCounters, FetchError>;
}

/// Host CPU and memory. Always yields a record.
#[async_trait]
pub trait HostSource: Send + Sync {
    async fn host_stats(&self) -> HostRecord;
}

/// Liveness check against a target's health URL.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> bool;
}
