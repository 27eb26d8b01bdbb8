// Docker container stats via bollard: one non-streaming stats read per target per tick

mod stats;

pub use stats::{cpu_percent, memory_percent};

use crate::models::ContainerCounters;
use crate::sources::{ContainerSource, FetchError};
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as DockerError;
use bollard::query_parameters::{InspectContainerOptions, StatsOptions};
use futures_util::StreamExt;
use tracing::instrument;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to the local daemon and ping it. Failure here is fatal for the process.
    pub async fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        docker.ping().await?;
        Ok(Self { docker })
    }

    async fn container_status(&self, name: &str) -> Result<String, FetchError> {
        let inspect = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| not_found_or(name, e))?;
        Ok(inspect
            .state
            .and_then(|s| s.status)
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".into()))
    }
}

#[async_trait]
impl ContainerSource for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "get_counters"))]
    async fn get_counters(&self, name: &str) -> Result<ContainerCounters, FetchError> {
        let status = self.container_status(name).await?;

        // stream=false makes the daemon wait for a second sample and fill precpu_stats.
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(name, Some(options));
        let response = match stream.next().await {
            Some(Ok(s)) => s,
            Some(Err(e)) => return Err(not_found_or(name, e)),
            None => return Err(FetchError::Incomplete(name.to_string())),
        };

        stats::process_statistics(&response, &status)
            .ok_or_else(|| FetchError::Incomplete(name.to_string()))
    }
}

fn not_found_or(name: &str, e: DockerError) -> FetchError {
    match e {
        DockerError::DockerResponseServerError {
            status_code: 404, ..
        } => FetchError::NotFound(name.to_string()),
        other => FetchError::Docker(other),
    }
}
