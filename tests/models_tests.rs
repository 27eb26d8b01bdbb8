// Model serialization tests (JSON shape of snapshots and records)

mod common;

use common::{record, snapshot};
use perfmon::models::*;

#[test]
fn test_snapshot_containers_serialize_as_object_keyed_by_name() {
    let s = snapshot(&["node-nextjs-app", "bun-nextjs-app"]);
    let value = serde_json::to_value(&s).unwrap();
    let containers = value["containers"].as_object().unwrap();
    assert_eq!(containers.len(), 2);
    let node = &containers["node-nextjs-app"];
    assert_eq!(node["container_name"], "node-nextjs-app");
    assert_eq!(node["cpu_percent"], 1.5);
    assert_eq!(node["memory_usage_mb"], 128.0);
    assert_eq!(node["healthy"], true);
    assert!(value["timestamp"].is_string());
    assert_eq!(value["system"]["system_memory_available_gb"], 8.0);
}

#[test]
fn test_snapshot_json_keeps_target_order() {
    let s = snapshot(&["zeta", "alpha", "mid"]);
    let json = serde_json::to_string(&s).unwrap();
    let zeta = json.find("\"zeta\"").unwrap();
    let alpha = json.find("\"alpha\"").unwrap();
    let mid = json.find("\"mid\"").unwrap();
    assert!(zeta < alpha && alpha < mid);

    let back: Snapshot = serde_json::from_str(&json).unwrap();
    let names: Vec<&str> = back
        .containers
        .iter()
        .map(|c| c.container_name.as_str())
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_unlimited_memory_serializes_as_null() {
    let mut r = record("web", chrono::Local::now());
    r.memory_percent = None;
    let value = serde_json::to_value(&r).unwrap();
    assert!(value["memory_percent"].is_null());
}

#[test]
fn test_rounding_helpers() {
    assert_eq!(round2(1.005_1), 1.01);
    assert_eq!(round2(33.333_333), 33.33);
    assert_eq!(bytes_to_mb(256 * 1024 * 1024), 256.0);
    assert_eq!(bytes_to_mb(1_500_000), 1.43);
    assert_eq!(bytes_to_gb(8 * 1024 * 1024 * 1024), 8.0);
    assert_eq!(bytes_to_gb(1024 * 1024 * 1024 / 4), 0.25);
}

#[test]
fn test_default_targets() {
    let targets = default_targets();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0], Target::new("node-nextjs-app", "http://localhost:3001"));
    assert_eq!(targets[2].name, "bun-nextjs-app");
}
