//! Normalization of stored time values.
//!
//! The document store writes times in several shapes depending on the client
//! version and on whether the value went through the server SDK:
//!
//! - a plain number of milliseconds (`5000`, sometimes `5000.4`)
//! - a numeric string (`"5000"`)
//! - a store timestamp object `{"_seconds": 1700000000, "_nanoseconds": 250000000}`
//!   (also written without the leading underscores)
//!
//! Event offsets are normalized to whole milliseconds; absolute session times
//! (`started_at`, `completed_at`) are converted to [`DateTime<Utc>`].

use chrono::{DateTime, Utc};
use serde_json::Value;

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Converts a stored time value into a millisecond count.
///
/// Returns `None` for negative, non-finite, overflowing or otherwise
/// unparsable values.
#[must_use]
pub fn millis_from_json(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(millis_from_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(millis_from_f64))
        }
        Value::Object(_) => {
            let (seconds, nanos) = seconds_and_nanos(value)?;
            seconds
                .checked_mul(1000)?
                .checked_add(u64::from(nanos) / NANOS_PER_MILLI)
        }
        _ => None,
    }
}

/// Converts a stored absolute time into a UTC datetime.
///
/// Plain numbers and numeric strings are read as Unix seconds, which is how
/// the dashboard export writes them.
#[must_use]
pub fn datetime_from_json(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(_) => {
            let (seconds, nanos) = seconds_and_nanos(value)?;
            DateTime::from_timestamp(i64::try_from(seconds).ok()?, nanos)
        }
        Value::Number(n) => {
            let secs = n.as_f64()?;
            datetime_from_f64_seconds(secs)
        }
        Value::String(s) => datetime_from_f64_seconds(s.trim().parse().ok()?),
        _ => None,
    }
}

fn seconds_and_nanos(value: &Value) -> Option<(u64, u32)> {
    let field = |names: [&str; 2]| names.iter().find_map(|name| value.get(name));
    let seconds = field(["_seconds", "seconds"])?.as_u64()?;
    let nanos = match field(["_nanoseconds", "nanoseconds"]) {
        Some(v) => v.as_u64()?,
        None => 0,
    };
    if nanos >= NANOS_PER_SECOND {
        return None;
    }
    Some((seconds, u32::try_from(nanos).ok()?))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn millis_from_f64(ms: f64) -> Option<u64> {
    if !ms.is_finite() || ms < 0.0 || ms >= u64::MAX as f64 {
        return None;
    }
    Some(ms.trunc() as u64)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn datetime_from_f64_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}
