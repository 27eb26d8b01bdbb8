// One tick's snapshot and the flattened (one row per container) view used for CSV

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{ContainerRecord, HostRecord};

/// Everything collected in one tick. `containers` holds only the targets whose stats read
/// succeeded, in configuration order; it serializes as an object keyed by container name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub system: HostRecord,
    #[serde(with = "container_map")]
    pub containers: Vec<ContainerRecord>,
}

impl Snapshot {
    pub fn container(&self, name: &str) -> Option<&ContainerRecord> {
        self.containers.iter().find(|c| c.container_name == name)
    }
}

/// One CSV row: a snapshot's host fields repeated for each present container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    pub timestamp: DateTime<Local>,
    pub system_cpu_percent: f64,
    pub system_memory_percent: f64,
    pub system_memory_available_gb: f64,
    pub container_name: String,
    pub container_cpu_percent: f64,
    pub container_memory_usage_mb: f64,
    pub container_memory_percent: Option<f64>,
    pub container_healthy: bool,
    pub container_status: String,
}

impl FlatRow {
    pub const COLUMNS: [&'static str; 10] = [
        "timestamp",
        "system_cpu_percent",
        "system_memory_percent",
        "system_memory_available_gb",
        "container_name",
        "container_cpu_percent",
        "container_memory_usage_mb",
        "container_memory_percent",
        "container_healthy",
        "container_status",
    ];
}

/// Cross product of each snapshot with its present containers. A snapshot with no
/// containers contributes no rows.
pub fn flatten(series: &[Snapshot]) -> Vec<FlatRow> {
    series
        .iter()
        .flat_map(|snapshot| {
            snapshot.containers.iter().map(move |c| FlatRow {
                timestamp: snapshot.timestamp,
                system_cpu_percent: snapshot.system.system_cpu_percent,
                system_memory_percent: snapshot.system.system_memory_percent,
                system_memory_available_gb: snapshot.system.system_memory_available_gb,
                container_name: c.container_name.clone(),
                container_cpu_percent: c.cpu_percent,
                container_memory_usage_mb: c.memory_usage_mb,
                container_memory_percent: c.memory_percent,
                container_healthy: c.healthy,
                container_status: c.status.clone(),
            })
        })
        .collect()
}

/// Serializes `Vec<ContainerRecord>` as `{ name: record, ... }`, keeping order.
mod container_map {
    use super::ContainerRecord;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        records: &[ContainerRecord],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(records.len()))?;
        for r in records {
            map.serialize_entry(&r.container_name, r)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ContainerRecord>, D::Error> {
        struct RecordMapVisitor;

        impl<'de> Visitor<'de> for RecordMapVisitor {
            type Value = Vec<ContainerRecord>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of container name to container record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, mut record)) =
                    access.next_entry::<String, ContainerRecord>()?
                {
                    record.container_name = name;
                    out.push(record);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(RecordMapVisitor)
    }
}
