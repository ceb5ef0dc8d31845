//! Timestamp and validity-date helpers.
//!
//! Audit timestamps are RFC 3339 strings; stay-validity dates are
//! `YYYY-MM-DD` strings. Both are stored as text and parsed on demand,
//! with missing or unparseable values treated as epoch zero for sorting.

use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Current UTC calendar date.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Timestamp for sort keys: absent or malformed values sort as epoch zero
/// (oldest) rather than erroring.
pub fn timestamp_or_epoch(value: Option<&str>) -> OffsetDateTime {
    value
        .and_then(parse_timestamp)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Same calendar date one year later. Feb 29 clamps to Feb 28 when the
/// target year is not a leap year.
pub fn add_one_year(date: Date) -> Date {
    date.replace_year(date.year() + 1).unwrap_or_else(|_| {
        Date::from_calendar_date(date.year() + 1, Month::February, 28)
            .expect("Feb 28 exists in every year")
    })
}
