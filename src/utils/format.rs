use chrono::{DateTime, FixedOffset};

use crate::types::Timestamp;

const INVALID_DATE: &str = "Invalid Date";

/// Format a fraction as a percentage with `decimals` digits.
///
/// With `trim` set, trailing zeros (and a dangling decimal point) are removed,
/// so `0.4` becomes `40%` and `1.0 / 3.0` becomes `33.3%`.
pub fn format_percent(fraction: f64, decimals: usize, trim: bool) -> String {
    if !fraction.is_finite() {
        return "0%".to_string();
    }

    let mut text = format!("{:.*}", decimals, fraction * 100.0);
    if trim && text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text.push('%');
    text
}

/// `Thursday, May 1, 2025 at 2:23 PM`
pub fn format_full(datetime: &Timestamp) -> String {
    format_with(datetime, "%A, %B %-d, %Y at %-I:%M %p")
}

/// `May 1, 2025, 2:23 PM`
pub fn format_medium(datetime: &Timestamp) -> String {
    format_with(datetime, "%b %-d, %Y, %-I:%M %p")
}

/// `May 1, 2025`
pub fn format_long_date(datetime: &Timestamp) -> String {
    format_with(datetime, "%B %-d, %Y")
}

fn format_with(datetime: &Timestamp, pattern: &str) -> String {
    match datetime {
        Some(dt) => dt.format(pattern).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Hour-axis tick label, e.g. `06:00`.
pub fn format_hour(hour: f64) -> String {
    format!("{:02}:00", (hour as i64).rem_euclid(24))
}

/// Axis label for a time tick, coarser as the tick interval grows.
pub fn format_time_tick(datetime: &DateTime<FixedOffset>, interval_secs: i64) -> String {
    let pattern = if interval_secs >= 365 * 86_400 {
        "%Y"
    } else if interval_secs >= 28 * 86_400 {
        "%B"
    } else if interval_secs >= 86_400 {
        "%a %d"
    } else {
        "%I %p"
    };
    datetime.format(pattern).to_string()
}
