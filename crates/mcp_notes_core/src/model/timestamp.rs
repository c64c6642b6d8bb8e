//! UTC timestamp helpers for note lifecycle fields.
//!
//! # Invariants
//! - Rendered timestamps have a fixed width (`YYYY-MM-DDTHH:MM:SS.ffffffZ`),
//!   so lexical order equals chronological order.
//! - `next_timestamp` is strictly greater than the previous value it is given.

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};

/// Renders an instant in the persisted ISO-8601 form with a `Z` suffix.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current UTC instant in persisted form.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Returns a fresh timestamp that sorts after `previous`.
///
/// Falls back to `previous + 1µs` when the clock has not advanced (coarse
/// clocks, rapid successive updates). `previous` is compared as an instant,
/// since `...:SSZ` and `...:SS.ffffffZ` do not sort lexically. Unparseable
/// previous values are ignored.
pub fn next_timestamp(previous: &str) -> String {
    let now = Utc::now();
    // Compare at the persisted precision.
    let now = now
        .with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now);
    match DateTime::parse_from_rfc3339(previous) {
        Ok(parsed) => {
            let previous = parsed.with_timezone(&Utc);
            if now > previous {
                format_timestamp(now)
            } else {
                format_timestamp(previous + Duration::microseconds(1))
            }
        }
        Err(_) => format_timestamp(now),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, next_timestamp, now_timestamp};
    use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};

    #[test]
    fn format_uses_fixed_micros_and_z_suffix() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        assert_eq!(format_timestamp(instant), "2024-03-09T07:05:00.000000Z");
    }

    #[test]
    fn next_timestamp_bumps_past_future_value() {
        let previous = "2999-12-31T23:59:59.999999Z";
        assert_eq!(next_timestamp(previous), "3000-01-01T00:00:00.000000Z");
    }

    #[test]
    fn next_timestamp_uses_clock_when_it_advanced() {
        let previous = "2000-01-01T00:00:00.000000Z";
        let next = next_timestamp(previous);
        assert!(next.as_str() > previous);
        assert!(next.as_str() <= now_timestamp().as_str());
    }

    #[test]
    fn next_timestamp_compares_second_precision_values_as_instants() {
        // Whole-second form of an instant at least 5ms ago; within the same
        // second the fresh value sorts lexically below it (`.` < `Z`).
        let base = Utc::now() - Duration::milliseconds(5);
        let previous = base.to_rfc3339_opts(SecondsFormat::Secs, true);
        let next = next_timestamp(&previous);

        let elapsed = DateTime::parse_from_rfc3339(&next).unwrap()
            - DateTime::parse_from_rfc3339(&previous).unwrap();
        assert!(elapsed >= Duration::milliseconds(5));

        let future = "2999-12-31T23:59:59Z";
        assert_eq!(next_timestamp(future), "2999-12-31T23:59:59.000001Z");
    }

    #[test]
    fn next_timestamp_ignores_unparseable_previous() {
        let next = next_timestamp("not a timestamp");
        assert!(next.ends_with('Z'));
        assert_eq!(next.len(), "2024-01-01T00:00:00.000000Z".len());
    }
}
