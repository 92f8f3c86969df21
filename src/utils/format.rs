//! Human-readable formatting for sizes and timestamps

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const SIZE_BASE: f64 = 1024.0;

/// Format a byte count using binary units, e.g. `1536` -> `"1.5 KB"`.
///
/// Values are rounded to two decimals with trailing zeros dropped. Anything
/// past gigabytes is still expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= SIZE_BASE && unit < SIZE_UNITS.len() - 1 {
        value /= SIZE_BASE;
        unit += 1;
    }

    format!("{} {}", trim_decimals(value), SIZE_UNITS[unit])
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Render a server timestamp as local wall-clock time (`HH:MM:SS`).
///
/// Accepts RFC 3339 and the naive ISO-8601 form the server emits. Missing
/// or unparseable input yields an empty string.
pub fn format_time(timestamp: Option<&str>) -> String {
    match timestamp.map(str::trim).filter(|s| !s.is_empty()) {
        Some(ts) => parse_timestamp(ts)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_default(),
        None => String::new(),
    }
}

fn parse_timestamp(ts: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}
