//! Reminder settings record.
//!
//! A single canonical schema shared by the decision engine and every
//! settings editor (CLI, GUI). Keys are camelCase on disk:
//!
//! ```toml
//! enabled = true
//! startHour = 17
//! startMinute = 0
//! latestHour = 23
//! latestMinute = 0
//! intervalMinutes = 15
//! days = [1, 2, 3, 4, 5]
//! lastNotifiedAt = 0
//! skipToday = false
//! lastSkipDate = ""
//! skipTaiwanHolidays = true
//! ```
//!
//! Missing keys are filled from [`Settings::default`], so a partial file is
//! never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ConfigError;

/// Persisted reminder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enabled: bool,
    pub start_hour: u32,
    pub start_minute: u32,
    pub latest_hour: u32,
    pub latest_minute: u32,
    /// Minimum spacing between two notifications.
    pub interval_minutes: u32,
    /// ISO weekday numbers, 1 = Monday .. 7 = Sunday.
    pub days: BTreeSet<u8>,
    /// Epoch milliseconds of the last notification; `0` means never.
    pub last_notified_at: i64,
    pub skip_today: bool,
    /// Local date (`YYYY-MM-DD`) the skip was requested on.
    pub last_skip_date: String,
    /// Older settings files spell this `skipTaiwanHoliday`.
    #[serde(alias = "skipTaiwanHoliday")]
    pub skip_taiwan_holidays: bool,
}

/// Keys of the canonical schema, in on-disk order.
pub const SETTINGS_KEYS: [&str; 11] = [
    "enabled",
    "startHour",
    "startMinute",
    "latestHour",
    "latestMinute",
    "intervalMinutes",
    "days",
    "lastNotifiedAt",
    "skipToday",
    "lastSkipDate",
    "skipTaiwanHolidays",
];

fn default_days() -> BTreeSet<u8> {
    (1..=5).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            start_hour: 17,
            start_minute: 0,
            latest_hour: 23,
            latest_minute: 0,
            interval_minutes: 15,
            days: default_days(),
            last_notified_at: 0,
            skip_today: false,
            last_skip_date: String::new(),
            skip_taiwan_holidays: true,
        }
    }
}

impl Settings {
    /// Enforce the record invariants: `days` keeps only 1..=7 and falls back
    /// to Monday..Friday when nothing is left, `interval_minutes` is at
    /// least 1.
    pub fn normalized(mut self) -> Self {
        self.days.retain(|d| (1..=7).contains(d));
        if self.days.is_empty() {
            self.days = default_days();
        }
        self.interval_minutes = self.interval_minutes.max(1);
        self
    }

    /// Check the time-of-day fields are real clock values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("startHour", self.start_hour, 23),
            ("startMinute", self.start_minute, 59),
            ("latestHour", self.latest_hour, 23),
            ("latestMinute", self.latest_minute, 59),
        ];
        for (key, value, max) in checks {
            if value > max {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("{value} is out of range 0..={max}"),
                });
            }
        }
        Ok(())
    }

    /// Return a copy with `patch` applied on top.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();
        patch.apply(&mut next);
        next
    }

    /// Get a value as string by its camelCase key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by its camelCase key, parsing `value` according to the
    /// type already stored under that key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails [`Settings::validate`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Array(_) => parse_day_list(value).map_err(invalid)?,
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(key.to_string(), new_value);

        let next: Settings = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Accept either a JSON array (`[1,2,3]`) or a bare list (`1,2,3`).
fn parse_day_list(value: &str) -> Result<serde_json::Value, String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| e.to_string());
    }
    let days = trimmed
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("cannot parse '{part}' as weekday number"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::json!(days))
}

/// Partial settings write. Unset fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<BTreeSet<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notified_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_today: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_skip_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_taiwan_holidays: Option<bool>,
}

impl SettingsPatch {
    /// Patch that records a notification sent at `now_ms`.
    pub fn notified_at(now_ms: i64) -> Self {
        Self {
            last_notified_at: Some(now_ms),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.enabled {
            settings.enabled = v;
        }
        if let Some(v) = self.start_hour {
            settings.start_hour = v;
        }
        if let Some(v) = self.start_minute {
            settings.start_minute = v;
        }
        if let Some(v) = self.latest_hour {
            settings.latest_hour = v;
        }
        if let Some(v) = self.latest_minute {
            settings.latest_minute = v;
        }
        if let Some(v) = self.interval_minutes {
            settings.interval_minutes = v;
        }
        if let Some(ref v) = self.days {
            settings.days = v.clone();
        }
        if let Some(v) = self.last_notified_at {
            settings.last_notified_at = v;
        }
        if let Some(v) = self.skip_today {
            settings.skip_today = v;
        }
        if let Some(ref v) = self.last_skip_date {
            settings.last_skip_date = v.clone();
        }
        if let Some(v) = self.skip_taiwan_holidays {
            settings.skip_taiwan_holidays = v;
        }
    }
}
