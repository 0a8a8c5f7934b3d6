//! Date/time parsing for extract values.
//!
//! Extract dates arrive in whatever layout the source system exported. Each
//! layout below is tried in turn; the first that parses wins. Slash dates
//! are read month-first, matching the exporters this job was built for.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::TimeUnit;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S", // US
    "%m/%d/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
    "%d-%b-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",  // US: 01/15/2024
    "%d-%b-%Y",  // 15-Jan-2024
    "%d-%B-%Y",  // 15-January-2024
    "%d.%m.%Y",  // 15.01.2024
    "%Y%m%d",    // 20240115
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y",  // 15 Jan 2024
    "%d %B %Y",  // 15 January 2024
];

/// Parse a date or date-time string.
///
/// Dates without a time component land on midnight. Offsets such as `Z` or
/// `+02:00` are accepted and the wall-clock time is kept.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Milliseconds since the Unix epoch, the unit coerced date columns use.
pub fn to_epoch_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Inverse of the physical representation of a Polars datetime value.
pub fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
    };
    Some(dt.naive_utc())
}

/// Store rendering of a date-time value.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
