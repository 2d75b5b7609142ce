use chrono::{Datelike, Local};
use clockout_core::error::Result;
use clockout_core::holiday::{HolidayCache, HolidaySource, HttpHolidaySource};
use clockout_core::Config;
use serde::Serialize;

#[derive(Serialize)]
struct HolidayEntry {
    date: String,
    description: String,
}

/// Unlike the engine, a failed fetch is reported here.
pub async fn run(year: Option<i32>) -> Result<()> {
    let config = Config::load()?;
    let year = year.unwrap_or_else(|| Local::now().year());

    let source = HttpHolidaySource::new(&config.holidays.base_url)?;
    let records = source.fetch_year(year).await?;

    let mut cache = HolidayCache::new();
    cache.fill(year, &records);

    let entries: Vec<HolidayEntry> = cache
        .dates()
        .map(|(date, description)| HolidayEntry {
            date: date.format("%Y-%m-%d").to_string(),
            description: description.to_string(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
