use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::{ClientError, ClientResult};

pub const REFERENCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const OPERATION_DATETIME_FORMATS: [&str; 2] = ["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];
const OPERATION_DATE_FORMAT: &str = "%d.%m.%Y";

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// First day of the reference month at midnight through the reference instant.
    pub fn month_to_date(reference: NaiveDateTime) -> Self {
        Self::new(month_start(reference), reference)
    }

    pub fn trailing_days(reference: NaiveDateTime, days: i64) -> Self {
        Self::new(reference - Duration::days(days), reference)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Day-first operation dates as the bank exports them.
pub fn parse_operation_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in OPERATION_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, OPERATION_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn parse_reference_datetime(value: &str) -> ClientResult<NaiveDateTime> {
    if !looks_like_reference(value) {
        return Err(ClientError::invalid_reference_date(value));
    }
    NaiveDateTime::parse_from_str(value, REFERENCE_FORMAT)
        .map_err(|_| ClientError::invalid_reference_date(value))
}

pub fn month_start(reference: NaiveDateTime) -> NaiveDateTime {
    reference
        .date()
        .with_day(1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(reference)
}

pub fn format_display_date(instant: &NaiveDateTime) -> String {
    instant.format("%d.%m.%Y").to_string()
}

pub fn format_reference(instant: &NaiveDateTime) -> String {
    instant.format(REFERENCE_FORMAT).to_string()
}

fn looks_like_reference(value: &str) -> bool {
    if value.len() != 19 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[10] != b' ' {
        return false;
    }
    if bytes[13] != b':' || bytes[16] != b':' {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}
