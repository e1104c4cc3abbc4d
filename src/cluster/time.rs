use chrono::{Datelike, NaiveDateTime};

use crate::error::{Error, Result};

/// Photo timestamp layout of the line format
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Date layout used in range labels
pub const DATE_LABEL_FORMAT: &str = "%Y/%m/%d";

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        Error::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Number of midnights crossed going from `before` to `after`
///
/// 23:00 on day N to 01:00 on day N+1 is one day, 00:10 to 23:50 of the same
/// day is zero. Never negative.
pub fn calendar_day_diff(before: &NaiveDateTime, after: &NaiveDateTime) -> i64 {
    (after.date() - before.date()).num_days().max(0)
}

/// Compares year, month and day, ignoring the time of day
pub fn is_same_day(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Absolute difference in whole seconds, `None` if either instant is unknown
pub fn time_diff_secs(a: Option<&NaiveDateTime>, b: Option<&NaiveDateTime>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((*b - *a).num_seconds().abs()),
        _ => None,
    }
}
