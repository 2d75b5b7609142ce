//! Day-level suppression: manual "skip today" and public holidays.
//!
//! The two checks are independent. A holiday refresh never touches the skip
//! flag and vice versa.

use chrono::{Datelike, NaiveDate};

use crate::holiday::HolidayOracle;
use crate::settings::{Settings, SettingsPatch};
use crate::window::date_string;

/// True iff the user asked to skip reminders on `now`'s local date.
///
/// The flag only counts while `last_skip_date` equals today, so it lapses at
/// local midnight without any cleanup write.
pub fn is_suppressed_today<T: Datelike>(settings: &Settings, now: &T) -> bool {
    settings.skip_today && settings.last_skip_date == date_string(now)
}

/// True iff holiday skipping is on and `now`'s local date is a holiday.
///
/// The oracle is only consulted when the setting is enabled, so a disabled
/// flag never triggers a fetch.
pub async fn is_holiday_suppressed<T: Datelike>(
    settings: &Settings,
    oracle: &mut HolidayOracle,
    now: &T,
) -> bool {
    if !settings.skip_taiwan_holidays {
        return false;
    }
    match NaiveDate::from_ymd_opt(now.year(), now.month(), now.day()) {
        Some(date) => oracle.is_holiday(date).await,
        None => false,
    }
}

/// Patch that suppresses reminders for the rest of `now`'s local date.
pub fn skip_today_patch<T: Datelike>(now: &T) -> SettingsPatch {
    SettingsPatch {
        skip_today: Some(true),
        last_skip_date: Some(date_string(now)),
        ..SettingsPatch::default()
    }
}

/// Patch that lifts a pending skip.
pub fn clear_skip_patch() -> SettingsPatch {
    SettingsPatch {
        skip_today: Some(false),
        ..SettingsPatch::default()
    }
}
