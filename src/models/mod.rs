// Domain models: targets, per-tick records, snapshots and their flattened rows

mod container;
mod snapshot;
mod system;
mod target;

pub use container::{ContainerCounters, ContainerRecord, UNLIMITED_MEMORY_BYTES};
pub use snapshot::{FlatRow, Snapshot, flatten};
pub use system::HostRecord;
pub use target::{Target, default_targets};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Round to two decimal places (all published percentages and sizes use this precision).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}
