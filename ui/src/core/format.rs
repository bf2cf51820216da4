//! Formatting helpers for presenting timings and statistics.

use std::time::Duration;

/// Stopwatch display: `HH:MM:SS.mmm`.
pub fn format_clock(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

pub fn format_seconds(value: f64) -> String {
    format!("{value:.2} s")
}

/// Two-decimal number, or an em dash when the statistic is undefined.
pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "—".to_string(),
    }
}
