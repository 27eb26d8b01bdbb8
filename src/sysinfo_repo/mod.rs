// Host stats via sysinfo

use crate::models::{HostRecord, bytes_to_gb, round2};
use crate::sources::HostSource;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use sysinfo::System;
use tracing::instrument;

pub const DEFAULT_CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    cpu_sample_window: Duration,
}

impl SysinfoRepo {
    /// `cpu_sample_window` is how long each CPU reading blocks; raised to sysinfo's minimum if shorter.
    pub fn new(cpu_sample_window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            cpu_sample_window: cpu_sample_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    pub fn cpu_sample_window(&self) -> Duration {
        self.cpu_sample_window
    }

    /// Blocking read: refresh, wait one window, refresh again so usage covers that window.
    fn sample(sys: &Mutex<System>, window: Duration) -> (f64, f64, f64) {
        let mut sys = sys.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_cpu_usage();
        std::thread::sleep(window);
        sys.refresh_cpu_usage();
        let cpu = f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0);

        sys.refresh_memory();
        let total = sys.total_memory();
        let available = sys.available_memory();
        let used = total.saturating_sub(available);
        let memory_percent = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        (round2(cpu), round2(memory_percent), bytes_to_gb(available))
    }
}

#[async_trait]
impl HostSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "host_stats"))]
    async fn host_stats(&self) -> HostRecord {
        let sys = self.sys.clone();
        let window = self.cpu_sample_window;
        match tokio::task::spawn_blocking(move || Self::sample(&sys, window)).await {
            Ok((cpu, memory_percent, available_gb)) => HostRecord {
                system_cpu_percent: cpu,
                system_memory_percent: memory_percent,
                system_memory_available_gb: available_gb,
                timestamp: chrono::Local::now(),
            },
            Err(e) => {
                tracing::warn!(error = %e, operation = "host_stats", "sysinfo task join failed");
                HostRecord::unavailable(chrono::Local::now())
            }
        }
    }
}
