// HTTP health probes: a target is healthy iff GET on its URL returns 2xx within the timeout

use crate::sources::Prober;
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build health probe client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    #[instrument(skip(self), fields(operation = "probe"))]
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::debug!(status = %resp.status(), "health probe returned non-success");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one HTTP response with the given status line, then closes.
    async fn one_shot_server(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let resp = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(resp.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn probe_is_healthy_on_200() {
        let url = one_shot_server("HTTP/1.1 200 OK").await;
        let prober = HttpProber::new(Duration::from_secs(2)).unwrap();
        assert!(prober.probe(&url).await);
    }

    #[tokio::test]
    async fn probe_is_unhealthy_on_server_error() {
        let url = one_shot_server("HTTP/1.1 503 Service Unavailable").await;
        let prober = HttpProber::new(Duration::from_secs(2)).unwrap();
        assert!(!prober.probe(&url).await);
    }

    #[tokio::test]
    async fn probe_is_unhealthy_when_nothing_listens() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let prober = HttpProber::new(Duration::from_secs(2)).unwrap();
        assert!(!prober.probe(&format!("http://{addr}/")).await);
    }

    #[tokio::test]
    async fn probe_is_unhealthy_on_invalid_url() {
        let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
        assert!(!prober.probe("not a url").await);
    }

    #[tokio::test]
    async fn probe_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let prober = HttpProber::new(Duration::from_millis(200)).unwrap();
        assert!(!prober.probe(&format!("http://{addr}/")).await);
    }
}
