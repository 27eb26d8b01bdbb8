use crate::models::{Target, default_targets};
use crate::health::DEFAULT_PROBE_TIMEOUT;
use crate::series_store::DEFAULT_FILE_PREFIX;
use crate::sysinfo_repo::DEFAULT_CPU_SAMPLE_WINDOW;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitoring: MonitoringConfig,
    pub probe: ProbeConfig,
    pub output: OutputConfig,
    pub targets: Vec<Target>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monitoring: MonitoringConfig::default(),
            probe: ProbeConfig::default(),
            output: OutputConfig::default(),
            targets: default_targets(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub interval_secs: u64,
    /// Total run time; unset runs until SIGINT/SIGTERM.
    pub duration_secs: Option<u64>,
    /// How long each host CPU reading averages over.
    pub cpu_sample_window_ms: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            duration_secs: None,
            cpu_sample_window_ms: DEFAULT_CPU_SAMPLE_WINDOW.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "data".into(),
            file_prefix: DEFAULT_FILE_PREFIX.into(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, else `$CONFIG_FILE`, else `config.toml`. Only an explicitly named file
    /// must exist; a missing default `config.toml` falls back to built-in defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("CONFIG_FILE").map(Into::into));
        let s = match explicit {
            Some(p) => std::fs::read_to_string(&p)
                .map_err(|e| anyhow::anyhow!("config {}: {}", p.display(), e))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                std::fs::read_to_string(DEFAULT_CONFIG_PATH)?
            }
            None => String::new(),
        };
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.interval_secs)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.monitoring.duration_secs.map(Duration::from_secs)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.monitoring.cpu_sample_window_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.interval_secs > 0,
            "monitoring.interval_secs must be > 0, got {}",
            self.monitoring.interval_secs
        );
        if let Some(d) = self.monitoring.duration_secs {
            anyhow::ensure!(d > 0, "monitoring.duration_secs must be > 0 when set, got {}", d);
        }
        anyhow::ensure!(
            self.monitoring.cpu_sample_window_ms > 0,
            "monitoring.cpu_sample_window_ms must be > 0, got {}",
            self.monitoring.cpu_sample_window_ms
        );
        anyhow::ensure!(
            self.probe.timeout_secs > 0,
            "probe.timeout_secs must be > 0, got {}",
            self.probe.timeout_secs
        );
        anyhow::ensure!(!self.output.dir.is_empty(), "output.dir must be non-empty");
        anyhow::ensure!(
            !self.output.file_prefix.is_empty(),
            "output.file_prefix must be non-empty"
        );
        anyhow::ensure!(!self.targets.is_empty(), "targets must list at least one target");

        let mut seen = HashSet::new();
        for t in &self.targets {
            anyhow::ensure!(!t.name.is_empty(), "targets.name must be non-empty");
            anyhow::ensure!(
                seen.insert(t.name.as_str()),
                "targets.name must be unique, {} appears twice",
                t.name
            );
            anyhow::ensure!(
                t.url.starts_with("http://") || t.url.starts_with("https://"),
                "targets.url for {} must be http(s), got {:?}",
                t.name,
                t.url
            );
        }
        Ok(())
    }
}
