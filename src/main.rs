use anyhow::Result;
use clap::Parser;
use perfmon::collector::Collector;
use perfmon::config::AppConfig;
use perfmon::docker_repo::DockerRepo;
use perfmon::health::HttpProber;
use perfmon::series_store::SeriesStore;
use perfmon::sysinfo_repo::SysinfoRepo;
use perfmon::worker::{Monitor, MonitorConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Sample container and host performance, then save the series as JSON and CSV.
#[derive(Parser)]
#[command(name = "perfmon", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to $CONFIG_FILE, then ./config.toml if present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Sampling interval in seconds (overrides monitoring.interval_secs)
    #[arg(long, short)]
    interval: Option<u64>,

    /// Total run time in seconds; runs until interrupted if unset
    #[arg(long, short)]
    duration: Option<u64>,

    /// Output directory (overrides output.dir)
    #[arg(long)]
    output_dir: Option<String>,
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(i) = cli.interval {
        app_config.monitoring.interval_secs = i;
    }
    if let Some(d) = cli.duration {
        app_config.monitoring.duration_secs = Some(d);
    }
    if let Some(dir) = cli.output_dir {
        app_config.output.dir = dir;
    }
    app_config.validate()?;

    let docker_repo = Arc::new(
        DockerRepo::connect()
            .await
            .map_err(|e| anyhow::anyhow!("docker: {}", e))?,
    );
    let sysinfo_repo = Arc::new(SysinfoRepo::new(app_config.cpu_sample_window()));
    let prober = Arc::new(HttpProber::new(app_config.probe_timeout())?);
    let store = Arc::new(SeriesStore::new(
        &app_config.output.dir,
        app_config.output.file_prefix.clone(),
    ));

    let collector = Collector::new(
        app_config.targets.clone(),
        docker_repo,
        sysinfo_repo,
        prober,
        store,
    );
    let monitor = Monitor::new(
        collector,
        MonitorConfig {
            interval: app_config.interval(),
            duration: app_config.duration(),
            filename: None,
        },
    );

    let summary = monitor.run(shutdown_signal()).await?;
    tracing::info!(
        ticks = summary.ticks,
        reason = ?summary.reason,
        "Monitoring stopped"
    );
    if let Some(out) = summary.output {
        tracing::info!(
            json = %out.json_path.display(),
            csv = ?out.csv_path.map(|p| p.display().to_string()),
            "Output written"
        );
    }
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
