//! Timestamp bucketing

use chrono::{DateTime, TimeZone, Utc};

/// Round `at` down to the start of its `interval_secs` window
///
/// Non-positive intervals disable bucketing and return `at` unchanged.
/// Sub-second precision is dropped when bucketing.
pub fn bucket_timestamp(at: DateTime<Utc>, interval_secs: i64) -> DateTime<Utc> {
    if interval_secs <= 0 {
        return at;
    }

    let secs = at.timestamp();
    let bucket = secs - secs.rem_euclid(interval_secs);
    Utc.timestamp_opt(bucket, 0).single().unwrap_or(at)
}
