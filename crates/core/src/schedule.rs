//! Scheduling dates and the Eastern display timezone.
//!
//! Campaign dates are plain calendar dates. The display timezone is only
//! consulted when "today" or a wall-clock instant has to become a date.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::CoreError;

/// Timezone every calendar view and date filter resolves in.
pub const DISPLAY_TZ: Tz = chrono_tz::America::New_York;

/// Parse a scheduled date.
///
/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp which is reduced to its
/// UTC calendar date. Legacy values stored at noon UTC keep their day.
pub fn parse_schedule_date(input: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid date '{trimmed}'. Expected YYYY-MM-DD or an ISO 8601 timestamp"
            ))
        })
}

/// The calendar date of `instant` in the display timezone.
pub fn eastern_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&DISPLAY_TZ).date_naive()
}

pub fn today_eastern() -> NaiveDate {
    eastern_date(Utc::now())
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "startDate {start} is after endDate {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days`-day window ending on `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days),
            end: today,
        }
    }

    /// Resolve optional caller dates against a default window ending today.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        default_days: i64,
    ) -> Result<Self, CoreError> {
        let default = Self::last_days(today, default_days);
        let start = start.map(parse_schedule_date).transpose()?.unwrap_or(default.start);
        let end = end.map(parse_schedule_date).transpose()?.unwrap_or(default.end);
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while({
            let end = self.end;
            move |d| *d <= end
        })
    }
}

/// First and last day of a month.
pub fn month_range(year: i32, month: u32) -> Result<DateRange, CoreError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CoreError::Validation(format!("Invalid month {year}-{month}. Month must be 1-12"))
    })?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| CoreError::Validation(format!("Year {year} is out of range")))?;
    DateRange::new(start, next - Duration::days(1))
}

/// Year and month of a date, for defaulting calendar queries.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
