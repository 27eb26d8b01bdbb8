// Convert a raw Docker stats API response into counters, and counters into percentages.

use crate::models::{ContainerCounters, UNLIMITED_MEMORY_BYTES, round2};
use bollard::models::ContainerStatsResponse;

/// CPU utilisation from two cumulative readings, as `docker stats` computes it.
/// Returns 0.0 when the system counter did not advance (first sample, counter reset).
pub fn cpu_percent(
    cpu_usage: u64,
    precpu_usage: u64,
    system_usage: u64,
    presystem_usage: u64,
    cpu_count: u32,
) -> f64 {
    let cpu_delta = cpu_usage as i128 - precpu_usage as i128;
    let system_delta = system_usage as i128 - presystem_usage as i128;
    if system_delta <= 0 {
        return 0.0;
    }
    round2((cpu_delta as f64 / system_delta as f64) * f64::from(cpu_count) * 100.0)
}

/// Memory usage as a percentage of the limit; `None` when there is no real limit.
pub fn memory_percent(usage: u64, limit: u64) -> Option<f64> {
    if limit == 0 || limit >= UNLIMITED_MEMORY_BYTES {
        return None;
    }
    Some(round2(usage as f64 / limit as f64 * 100.0))
}

/// Extract counters from a one-shot stats response. `None` when the cpu or precpu block is missing.
pub(crate) fn process_statistics(
    s: &ContainerStatsResponse,
    status: &str,
) -> Option<ContainerCounters> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    // cgroup v1 reports per-core usage; v2 only reports online_cpus.
    let cpu_count = cpu_usage
        .percpu_usage
        .as_ref()
        .map(|p| p.len() as u32)
        .filter(|n| *n > 0)
        .or(cpu_stats.online_cpus)
        .filter(|n| *n > 0)
        .unwrap_or(1);

    let memory_usage_bytes = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit_bytes = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);

    Some(ContainerCounters {
        cpu_total_usage: cpu_usage.total_usage.unwrap_or(0),
        precpu_total_usage: precpu_usage.total_usage.unwrap_or(0),
        system_cpu_usage: cpu_stats.system_cpu_usage.unwrap_or(0),
        presystem_cpu_usage: precpu_stats.system_cpu_usage.unwrap_or(0),
        cpu_count,
        memory_usage_bytes,
        memory_limit_bytes,
        status: status.to_string(),
    })
}
