//! Human-readable sizes and timestamps for the file table.

use crate::api::FileRecord;

const K: u64 = 1024;
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count using binary units up to GB.
///
/// Anything at or past 1024 GB stays in GB with a `> ` prefix. The value is
/// rounded to two decimals and trailing zeros are dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut i = 0;
    let mut scale = 1u64;
    while bytes / scale >= K {
        scale *= K;
        i += 1;
    }

    if i >= UNITS.len() {
        let gb = round2(bytes as f64 / (K * K * K) as f64);
        return format!("> {} GB", gb);
    }

    format!("{} {}", round2(bytes as f64 / scale as f64), UNITS[i])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Upload time as local `YYYY-MM-DD HH:MM:SS`, or the raw server string
pub fn format_upload_time(record: &FileRecord) -> String {
    match record.uploaded_at() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => record.upload_time.clone(),
    }
}
