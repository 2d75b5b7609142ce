//! HTTP holiday source for the TaiwanCalendar yearly JSON files.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::source::{HolidayRecord, HolidaySource};
use crate::error::HolidayError;

/// Fetches `{base_url}/{year}.json`.
#[derive(Debug, Clone)]
pub struct HttpHolidaySource {
    base_url: Url,
    http_client: Client,
}

impl HttpHolidaySource {
    /// Create a source rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `HolidayError::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, HolidayError> {
        let base_url = Url::parse(base_url).map_err(|source| HolidayError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            http_client: Client::new(),
        })
    }

    /// URL of the calendar file for `year`.
    pub fn year_url(&self, year: i32) -> String {
        format!("{}/{year}.json", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl HolidaySource for HttpHolidaySource {
    async fn fetch_year(&self, year: i32) -> Result<Vec<HolidayRecord>, HolidayError> {
        let resp = self.http_client.get(self.year_url(year)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(HolidayError::Status {
                year,
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<Vec<HolidayRecord>>().await?)
    }
}
