use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

/// Saturday or Sunday.
pub fn is_weekend(d: NaiveDate) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Days of a trailing window ending at `today`, oldest first.
///
/// Yields `(days_ago, date)` for `days_ago = window..=0`, so a window of
/// 30 produces 31 entries.
pub fn trailing_window(today: NaiveDate, window: u32) -> impl Iterator<Item = (u32, NaiveDate)> {
    (0..=window)
        .rev()
        .map(move |days_ago| (days_ago, today - Duration::days(days_ago as i64)))
}

/// Multiplier that grows linearly from 1.0 on the oldest day of the window
/// to `1.0 + max_boost` on the most recent one.
pub fn recency_factor(window: u32, days_ago: u32, max_boost: f64) -> f64 {
    if window == 0 {
        return 1.0 + max_boost;
    }
    let elapsed = window.saturating_sub(days_ago) as f64;
    1.0 + elapsed / window as f64 * max_boost
}

/// Round to the nearest integer, ties to even, clamped at zero.
pub fn round_half_even(x: f64) -> u64 {
    x.round_ties_even().max(0.0) as u64
}

/// `part` as a percentage of `total`; 0.0 when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// The UTC instant at which `d` starts.
pub fn start_of_day_utc(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(NaiveTime::MIN).and_utc()
}
