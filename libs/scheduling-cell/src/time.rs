//! Clock-string and interval helpers shared by the availability engine.
//!
//! All scheduling arithmetic happens in minutes since midnight; `HH:MM`
//! strings exist only at the edges (store rows in, slot lists out).

use crate::error::SchedulingError;

/// Parse a clock string into minutes since midnight.
///
/// Accepts `HH:MM` and `HH:MM:SS` (Postgres `time` columns serialize with
/// seconds); any trailing seconds are ignored.
pub fn clock_to_minutes(clock: &str) -> Result<i32, SchedulingError> {
    let mut parts = clock.split(':');

    let hours: i32 = parts
        .next()
        .and_then(|h| h.parse().ok())
        .ok_or_else(|| SchedulingError::InvalidTime(format!("malformed clock value '{}'", clock)))?;
    let minutes: i32 = parts
        .next()
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| SchedulingError::InvalidTime(format!("malformed clock value '{}'", clock)))?;

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(SchedulingError::InvalidTime(format!(
            "clock value '{}' out of range",
            clock
        )));
    }

    Ok(hours * 60 + minutes)
}

/// Render minutes since midnight as a zero-padded `HH:MM` string.
///
/// `minutes` must be in `[0, 1440)`; the engine never produces values past
/// midnight because slots are bounded by same-day window ends.
pub fn minutes_to_clock(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Half-open interval overlap test.
///
/// Intervals are `[start, start + duration)`, so a slot ending exactly when
/// another begins does not conflict. This single predicate serves both
/// block-vs-slot and appointment-vs-slot checks.
pub fn intervals_overlap(a_start: i32, a_duration: i32, b_start: i32, b_duration: i32) -> bool {
    a_start < b_start + b_duration && a_start + a_duration > b_start
}
