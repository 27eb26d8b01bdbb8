// In-memory series of snapshots, flushed to JSON (nested) and CSV (one row per container).
// Appends and flushes share one lock so a flush never sees a half-appended series.

mod csv;

use crate::models::{FlatRow, Snapshot, flatten};
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::instrument;

pub const DEFAULT_FILE_PREFIX: &str = "performance_data";

/// Where a flush wrote the series. `csv_path` is `None` when no snapshot had any container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushOutput {
    pub json_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

pub struct SeriesStore {
    series: Mutex<Vec<Snapshot>>,
    output_dir: PathBuf,
    file_prefix: String,
    flush_calls: AtomicUsize,
}

impl SeriesStore {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            series: Mutex::new(Vec::new()),
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
            flush_calls: AtomicUsize::new(0),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Snapshot>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, snapshot: Snapshot) {
        self.lock().push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Most recent snapshot, if any tick has completed.
    pub fn latest(&self) -> Option<Snapshot> {
        self.lock().last().cloned()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.lock().clone()
    }

    /// The whole series flattened to one row per (snapshot, container).
    pub fn rows(&self) -> Vec<FlatRow> {
        flatten(&self.lock())
    }

    /// Number of times `flush` has been called, including no-op calls on an empty series.
    pub fn flush_calls(&self) -> usize {
        self.flush_calls.load(Ordering::Relaxed)
    }

    /// `<prefix>_YYYYmmdd_HHMMSS`, unique per second.
    pub fn default_filename(&self) -> String {
        format!(
            "{}_{}",
            self.file_prefix,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the series to `<dir>/<filename>.json` and, if it flattens to any rows,
    /// `<dir>/<filename>.csv`. Returns `None` without touching disk when the series is empty.
    #[instrument(skip(self), fields(operation = "flush"))]
    pub fn flush(&self, filename: Option<&str>) -> anyhow::Result<Option<FlushOutput>> {
        self.flush_calls.fetch_add(1, Ordering::Relaxed);
        let series = self.lock();
        if series.is_empty() {
            tracing::warn!("No data to save");
            return Ok(None);
        }

        let filename = filename.map_or_else(|| self.default_filename(), str::to_string);
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output dir {}", self.output_dir.display())
        })?;

        let json_path = self.output_dir.join(format!("{filename}.json"));
        let file = File::create(&json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &*series)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", json_path.display()))?;

        let rows = flatten(&series);
        let csv_path = if rows.is_empty() {
            tracing::warn!(
                snapshots = series.len(),
                "No container rows to flatten; skipping CSV"
            );
            None
        } else {
            let path = self.output_dir.join(format!("{filename}.csv"));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            csv::write_rows(BufWriter::new(file), &rows)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Some(path)
        };

        tracing::info!(
            snapshots = series.len(),
            rows = rows.len(),
            json = %json_path.display(),
            csv = ?csv_path.as_ref().map(|p| p.display().to_string()),
            "Data saved"
        );
        Ok(Some(FlushOutput {
            json_path,
            csv_path,
        }))
    }
}
