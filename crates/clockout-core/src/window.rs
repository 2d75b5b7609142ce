//! Daily active window and weekday predicates.
//!
//! Everything here works on the caller's local wall-clock time; no timezone
//! conversion happens. Pass a `DateTime<FixedOffset>`/`DateTime<Local>` or a
//! `NaiveDateTime` already in local time.

use chrono::{Datelike, Timelike};
use std::collections::BTreeSet;

/// True iff `now`'s (hour, minute) lies in `[start, latest]`.
///
/// Comparison is lexicographic on (hour, minute) and inclusive at both ends.
/// A start later than the latest time yields an empty window.
pub fn is_within_window<T: Timelike>(
    now: &T,
    start_hour: u32,
    start_minute: u32,
    latest_hour: u32,
    latest_minute: u32,
) -> bool {
    let current = (now.hour(), now.minute());
    current >= (start_hour, start_minute) && current <= (latest_hour, latest_minute)
}

/// ISO weekday number of `now`: 1 = Monday .. 7 = Sunday.
pub fn iso_weekday<T: Datelike>(now: &T) -> u8 {
    // chrono counts from Sunday = 0; Sunday maps to 7
    match now.weekday().num_days_from_sunday() {
        0 => 7,
        d => d as u8,
    }
}

/// True iff `now` falls on one of the ISO weekdays in `days`.
pub fn is_allowed_weekday<T: Datelike>(days: &BTreeSet<u8>, now: &T) -> bool {
    days.contains(&iso_weekday(now))
}

/// Local calendar date formatted as `YYYY-MM-DD`.
pub fn date_string<T: Datelike>(now: &T) -> String {
    format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day())
}
