use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// Inclusive calendar-day window. Both bounds carry no time-of-day; any
/// timestamp supplied by the caller is truncated to the start of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn from_strings(start: &str, end: &str) -> Result<Self, AppError> {
        let start = parse_day(start).ok_or(AppError::InvalidDate("start_date"))?;
        let end = parse_day(end).ok_or(AppError::InvalidDate("end_date"))?;
        Self::new(start, end)
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    None
}
