//! Year-keyed holiday cache.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

use super::source::HolidayRecord;

/// Load state of the cached year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing fetched yet.
    #[default]
    Empty,
    /// Fetched successfully; may legitimately hold zero dates.
    Loaded,
    /// Last fetch failed; lookups answer "no holiday" until a retry succeeds.
    Failed,
}

/// Holiday dates of a single year.
#[derive(Debug, Clone, Default)]
pub struct HolidayCache {
    year: Option<i32>,
    state: CacheState,
    dates: BTreeMap<NaiveDate, String>,
}

impl HolidayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Whether `year` can be answered without fetching.
    pub fn is_loaded_for(&self, year: i32) -> bool {
        self.year == Some(year) && self.state == CacheState::Loaded
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Cached holidays in date order with their descriptions.
    pub fn dates(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.dates.iter().map(|(d, desc)| (*d, desc.as_str()))
    }

    /// Replace the cache with the holiday entries of `records`.
    pub fn fill(&mut self, year: i32, records: &[HolidayRecord]) {
        let mut dates = BTreeMap::new();
        for record in records.iter().filter(|r| r.marks_holiday()) {
            match record.parsed_date() {
                Some(date) => {
                    dates.insert(date, record.description.clone());
                }
                None => warn!(year, date = %record.date, "skipping malformed holiday record"),
            }
        }
        self.year = Some(year);
        self.state = CacheState::Loaded;
        self.dates = dates;
    }

    /// Drop all dates and remember that `year` could not be fetched.
    pub fn mark_failed(&mut self, year: i32) {
        self.year = Some(year);
        self.state = CacheState::Failed;
        self.dates.clear();
    }
}
