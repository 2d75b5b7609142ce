//! Holiday oracle.
//!
//! Answers "is this local date a public holiday?" from a year-keyed cache
//! that is filled lazily from a [`HolidaySource`]. The oracle fails open: a
//! source error is logged and the year is treated as having no holidays, so
//! it can never block a reminder.
//!
//! A year that failed to load is fetched again on the next lookup. A year
//! that loaded successfully, even with zero holidays, is reused until a
//! different year is requested.

mod cache;
mod http;
mod source;

pub use cache::{CacheState, HolidayCache};
pub use http::HttpHolidaySource;
pub use source::{HolidayFlag, HolidayRecord, HolidaySource, HOLIDAY_MARK};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// Holiday lookups backed by a single-year cache.
pub struct HolidayOracle {
    source: Box<dyn HolidaySource>,
    cache: HolidayCache,
}

impl HolidayOracle {
    pub fn new(source: Box<dyn HolidaySource>) -> Self {
        Self {
            source,
            cache: HolidayCache::new(),
        }
    }

    /// Make sure `year` is cached, fetching it when needed.
    ///
    /// Never fails; a fetch error leaves an empty `Failed` cache for `year`.
    pub async fn ensure_loaded(&mut self, year: i32) {
        if self.cache.is_loaded_for(year) {
            return;
        }

        match self.source.fetch_year(year).await {
            Ok(records) => {
                self.cache.fill(year, &records);
                debug!(year, holidays = self.cache.len(), "holiday calendar loaded");
            }
            Err(e) => {
                warn!(year, error = %e, "holiday load failed, assuming no holidays");
                self.cache.mark_failed(year);
            }
        }
    }

    /// Whether `date` is a holiday. Unknown means `false`.
    pub async fn is_holiday(&mut self, date: NaiveDate) -> bool {
        self.ensure_loaded(date.year()).await;
        self.cache.contains(date)
    }

    pub fn cache(&self) -> &HolidayCache {
        &self.cache
    }
}
