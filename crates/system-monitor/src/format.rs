//! Human-readable formatting helpers shared by text reports.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

/// Longest sampling window a caller may request.
pub const MAX_SAMPLE_WINDOW: Duration = Duration::from_secs(10);

/// Format a byte count with binary units, e.g. `1.50 GiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const SUFFIXES: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT && exp < SUFFIXES.len() - 1 {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.2} {}", bytes as f64 / div as f64, SUFFIXES[exp])
}

/// Format an uptime in seconds as `Xd Yh Zm`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}

/// Render a UTC timestamp in the local timezone.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Parse a sampling window such as `500ms`, `5s` or `1m`.
///
/// Unparseable input falls back to one second; results are clamped to
/// [`MAX_SAMPLE_WINDOW`].
pub fn parse_sample_window(input: &str) -> Duration {
    let input = input.trim();
    let parsed = if let Some(ms) = input.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = input.strip_suffix('s') {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(Duration::from_secs_f64)
    } else if let Some(m) = input.strip_suffix('m') {
        m.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        None
    };

    match parsed {
        Some(d) if !d.is_zero() => d.min(MAX_SAMPLE_WINDOW),
        _ => Duration::from_secs(1),
    }
}
