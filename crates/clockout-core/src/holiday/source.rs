//! Holiday feed records and the source abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HolidayError;

/// Marker the TaiwanCalendar feed uses for days off.
pub const HOLIDAY_MARK: &str = "是";

/// `isHoliday` as published: older files use `"是"`/`"否"`, newer ones a bool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HolidayFlag {
    Text(String),
    Bool(bool),
}

impl HolidayFlag {
    pub fn is_set(&self) -> bool {
        match self {
            HolidayFlag::Text(s) => s == HOLIDAY_MARK,
            HolidayFlag::Bool(b) => *b,
        }
    }
}

/// One day of the yearly calendar feed. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// `YYYYMMDD`
    pub date: String,
    #[serde(rename = "isHoliday")]
    pub is_holiday: HolidayFlag,
    #[serde(default)]
    pub description: String,
}

impl HolidayRecord {
    pub fn new(date: impl Into<String>, holiday: bool) -> Self {
        let mark = if holiday { HOLIDAY_MARK } else { "否" };
        Self {
            date: date.into(),
            is_holiday: HolidayFlag::Text(mark.to_string()),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn marks_holiday(&self) -> bool {
        self.is_holiday.is_set()
    }

    /// Parse the compact `YYYYMMDD` date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y%m%d").ok()
    }
}

/// Anything that can produce a full year of calendar records.
#[async_trait]
pub trait HolidaySource: Send + Sync {
    async fn fetch_year(&self, year: i32) -> Result<Vec<HolidayRecord>, HolidayError>;
}
