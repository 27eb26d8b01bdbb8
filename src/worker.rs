// Sampling loop lifecycle: Idle -> Running -> Stopped, then exactly one flush.
// The flush also runs from a drop guard, so a panic inside a tick or a dropped `run` future
// still persists what was collected.

use crate::collector::Collector;
use crate::series_store::{FlushOutput, SeriesStore};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run duration elapsed.
    DurationElapsed,
    /// The shutdown future resolved (SIGINT/SIGTERM in the binary).
    Shutdown,
}

/// Loop timing and output naming.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval: Duration,
    /// Total run time; `None` runs until shutdown.
    pub duration: Option<Duration>,
    /// Flush filename without extension; `None` uses the timestamped default.
    pub filename: Option<String>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub reason: StopReason,
    pub output: Option<FlushOutput>,
}

pub struct Monitor {
    collector: Collector,
    config: MonitorConfig,
    state: Mutex<MonitorState>,
    ticks: AtomicU64,
}

impl Monitor {
    pub fn new(collector: Collector, config: MonitorConfig) -> Self {
        Self {
            collector,
            config,
            state: Mutex::new(MonitorState::Idle),
            ticks: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: MonitorState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn store(&self) -> &SeriesStore {
        self.collector.store()
    }

    /// Sample until the duration elapses or `shutdown` resolves, then flush once.
    /// A monitor runs at most once.
    pub async fn run<F>(&self, shutdown: F) -> anyhow::Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            anyhow::ensure!(
                *state == MonitorState::Idle,
                "monitor already started (state {:?})",
                *state
            );
            *state = MonitorState::Running;
        }
        let guard = FlushGuard::new(self.store(), self.config.filename.clone());

        tracing::info!(
            interval_secs = self.config.interval.as_secs_f64(),
            targets = self.collector.targets().len(),
            "Starting performance monitoring"
        );
        if let Some(d) = self.config.duration {
            tracing::info!(duration_secs = d.as_secs_f64(), "Monitoring will stop after duration");
        }

        let reason = tokio::select! {
            biased;
            _ = shutdown => {
                tracing::info!("Received shutdown signal. Stopping monitoring...");
                StopReason::Shutdown
            }
            reason = self.tick_loop() => reason,
        };

        self.set_state(MonitorState::Stopped);
        let output = guard.flush()?;
        Ok(RunSummary {
            ticks: self.ticks(),
            reason,
            output,
        })
    }

    /// Ticks back to back with `interval` of sleep in between. With a duration set, stops
    /// once the next tick would start at or after `start + duration`.
    async fn tick_loop(&self) -> StopReason {
        let started = Instant::now();
        loop {
            self.collector.collect_metrics().await;
            self.ticks.fetch_add(1, Ordering::Relaxed);

            if let Some(duration) = self.config.duration
                && started.elapsed().saturating_add(self.config.interval) >= duration
            {
                tracing::info!(ticks = self.ticks(), "Monitoring duration completed");
                return StopReason::DurationElapsed;
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }
}

/// Flushes the store when dropped unless `flush` already ran. Guarantees one flush per run.
pub struct FlushGuard<'a> {
    store: &'a SeriesStore,
    filename: Option<String>,
    flushed: bool,
}

impl<'a> FlushGuard<'a> {
    pub fn new(store: &'a SeriesStore, filename: Option<String>) -> Self {
        Self {
            store,
            filename,
            flushed: false,
        }
    }

    pub fn flush(mut self) -> anyhow::Result<Option<FlushOutput>> {
        self.flushed = true;
        self.store.flush(self.filename.as_deref())
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;
        tracing::warn!("Monitoring interrupted; flushing collected data");
        if let Err(e) = self.store.flush(self.filename.as_deref()) {
            tracing::error!(error = %e, operation = "flush", "Failed to save data on exit");
        }
    }
}
