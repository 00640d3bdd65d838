use chrono::{DateTime, Utc};

/// `mm:ss`; minutes are not capped at 59.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes:02}:{remainder:02}")
}

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

#[must_use]
pub fn format_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

/// One decimal and a percent sign.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}
