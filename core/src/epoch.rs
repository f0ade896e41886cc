//! Conversions between naive UTC datetimes and unix epoch seconds.
//!
//! All instrument timestamps are treated as UTC without a zone attached, so
//! the helpers work on [`NaiveDateTime`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::prelude::{CoreError, CoreResult};

/// Seconds from 1970-01-01 to 2001-01-01.
pub const SECONDS_1970_TO_2001: f64 = 978_307_200.0;

/// Seconds from 1970-01-01 to 1969-12-31T23:00.
pub const SECONDS_1970_TO_19691231T23: f64 = -3_600.0;

/// Datetime to unix timestamp.
pub fn dt_to_ts(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// Unix timestamp at midnight of `date`.
pub fn midnight_ts(date: NaiveDate) -> f64 {
    dt_to_ts(date.and_time(NaiveTime::MIN))
}

/// Unix timestamp to datetime, keeping sub-second precision.
pub fn ts_to_dt(ts: f64) -> CoreResult<NaiveDateTime> {
    if !ts.is_finite() {
        return Err(CoreError::TimestampOutOfRange(ts));
    }
    let secs = ts.floor();
    let nanos = (((ts - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.naive_utc())
        .ok_or(CoreError::TimestampOutOfRange(ts))
}

/// Seconds since 2001-01-01 to datetime.
pub fn since2001_to_dt(seconds: f64) -> CoreResult<NaiveDateTime> {
    ts_to_dt(seconds + SECONDS_1970_TO_2001)
}
