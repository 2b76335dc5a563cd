use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Utc};

/// Offset for Brazil wall-clock time. Fixed at UTC-3: the country dropped
/// daylight saving in 2019, so no tz database lookup is needed.
const BRAZIL_OFFSET_SECS: i32 = 3 * 3600;

/// Accepted layouts for timezone-naive device timestamps.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn brazil_offset() -> FixedOffset {
    FixedOffset::west_opt(BRAZIL_OFFSET_SECS).unwrap()
}

/// Normalizes a device-supplied timestamp string to UTC.
///
/// Strings carrying an explicit offset or `Z` already designate an instant
/// and are converted directly. Timezone-naive strings are taken as Brazil
/// local wall-clock time and shifted to UTC, so `2025-11-23T22:55:04`
/// becomes `2025-11-24T01:55:04Z`.
pub fn normalize(raw: &str) -> Result<DateTime<Utc>> {
    let rfc3339_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => return Ok(instant.with_timezone(&Utc)),
        Err(e) => e,
    };

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            // A fixed offset maps every wall-clock value to exactly one instant.
            if let LocalResult::Single(local) = naive.and_local_timezone(brazil_offset()) {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    Err(Error::TimestampParse {
        raw: raw.to_string(),
        source: rfc3339_err,
    })
}

/// Renders a stored UTC instant in Brazil local time for display.
pub fn to_brazil(utc: DateTime<Utc>) -> DateTime<FixedOffset> {
    utc.with_timezone(&brazil_offset())
}
