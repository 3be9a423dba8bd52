//! Human-readable rendering of second offsets.

/// Format a second offset as a clock string with centisecond precision.
///
/// `H:MM:SS.CC` when there is an hour component, `M:SS.CC` otherwise.
/// Centiseconds are truncated, not rounded.
pub fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
    } else {
        format!("{}:{:02}.{:02}", minutes, secs, centis)
    }
}

/// Format a duration in whole units: `1h 2m 5s`, `2m 5s`, `45s`.
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
