//! Time formatting helpers.

use ballot_types::Timestamp;

/// Format a duration in milliseconds to a human-readable string.
pub fn format_duration_ms(millis: u64) -> String {
    let secs = millis / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "in 2h 5m" style countdown to `deadline`, or `None` once it has passed.
pub fn format_until(deadline: Timestamp, now: Timestamp) -> Option<String> {
    match deadline.remaining_from(now) {
        0 => None,
        left => Some(format!("in {}", format_duration_ms(left))),
    }
}
