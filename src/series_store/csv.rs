// Minimal CSV writer for flattened rows (RFC 4180 quoting, header first).
// Floats keep a decimal point (`128.0`, not `128`).

use crate::models::FlatRow;
use std::io::{self, Write};

pub(super) fn write_rows<W: Write>(mut w: W, rows: &[FlatRow]) -> io::Result<()> {
    writeln!(w, "{}", FlatRow::COLUMNS.join(","))?;
    for r in rows {
        writeln!(
            w,
            "{},{:?},{:?},{:?},{},{:?},{:?},{},{},{}",
            r.timestamp.to_rfc3339(),
            r.system_cpu_percent,
            r.system_memory_percent,
            r.system_memory_available_gb,
            escape(&r.container_name),
            r.container_cpu_percent,
            r.container_memory_usage_mb,
            r.container_memory_percent
                .map_or_else(String::new, |v| format!("{v:?}")),
            if r.container_healthy { "True" } else { "False" },
            escape(&r.container_status),
        )?;
    }
    w.flush()
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
