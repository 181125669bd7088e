use crate::error::{ProcessingError, Result};
use crate::models::{DailySpread, MergedRow};
use crate::utils::constants::DATE_FORMAT;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parse a strict, zero padded `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let date_error = || ProcessingError::DateParse {
        value: value.to_string(),
    };

    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| date_error())?;

    // chrono accepts unpadded fields such as 2023-1-1; they would not round-trip
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(date_error());
    }

    Ok(date)
}

/// Milliseconds since the Unix epoch at midnight UTC of `date`
pub fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// The UTC calendar date of an epoch timestamp in milliseconds
pub fn date_from_epoch_millis(epochmilli: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(epochmilli).map(|instant| instant.date_naive())
}

/// Adds the `epochmilli` field to merged rows.
pub struct EpochEnricher;

impl EpochEnricher {
    pub fn new() -> Self {
        Self
    }

    /// Any malformed date fails the whole batch
    pub fn enrich(&self, rows: &[MergedRow]) -> Result<Vec<DailySpread>> {
        rows.iter()
            .map(|row| {
                let date = parse_date(&row.date)?;
                Ok(DailySpread::new(epoch_millis(date), row.clone()))
            })
            .collect()
    }
}

impl Default for EpochEnricher {
    fn default() -> Self {
        Self::new()
    }
}
