use chrono::prelude::*;

use crate::error::{Error, Result};

pub type Timestamp = DateTime<Utc>;

/// Conversion of wall-clock times into UTC instants.
///
/// Times without zone information are taken to be UTC already.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Timestamp;
}

impl IntoTimestamp for DateTime<Utc> {
    #[inline]
    fn into_timestamp(self) -> Timestamp {
        self
    }
}

impl IntoTimestamp for DateTime<FixedOffset> {
    #[inline]
    fn into_timestamp(self) -> Timestamp {
        self.with_timezone(&Utc)
    }
}

impl IntoTimestamp for DateTime<Local> {
    #[inline]
    fn into_timestamp(self) -> Timestamp {
        self.with_timezone(&Utc)
    }
}

impl IntoTimestamp for NaiveDateTime {
    #[inline]
    fn into_timestamp(self) -> Timestamp {
        Utc.from_utc_datetime(&self)
    }
}

/// Renders `ts` in RFC3339 "Zulu" form with microsecond precision,
/// e.g. `2016-04-06T22:05:00.042000Z`, or nanosecond precision when the
/// instant carries sub-microsecond digits.
pub fn to_rfc3339(ts: &Timestamp) -> String {
    let format = if ts.timestamp_subsec_nanos() % 1000 != 0 {
        SecondsFormat::Nanos
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(format, true)
}

pub fn parse_rfc3339(s: &str) -> Result<Timestamp> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::malformed(format!("couldn't parse timestamp '{}'", s)).caused_by(e))
}

/// Truncates `ts` to the start of its minute.
pub fn start_of_minute(ts: &Timestamp) -> Timestamp {
    Utc.from_utc_datetime(
        &ts.date_naive()
            .and_hms_opt(ts.hour(), ts.minute(), 0)
            .unwrap_or_else(|| ts.naive_utc()),
    )
}
