//! Timestamp type and clock abstraction.
//!
//! Timestamps are UTC instants truncated to millisecond precision so that a
//! persisted record reproduces the in-memory value exactly.

use chrono::{DateTime, TimeZone, Utc};

/// UTC instant used for `created_at`/`updated_at`.
pub type Timestamp = DateTime<Utc>;

/// Source of "now" for note timestamps and generated ids.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        truncate_to_millis(Utc::now())
    }
}

/// Drops sub-millisecond precision.
pub fn truncate_to_millis(value: Timestamp) -> Timestamp {
    from_epoch_ms(value.timestamp_millis())
}

/// Builds a timestamp from Unix epoch milliseconds.
///
/// Out-of-range values saturate to the Unix epoch.
pub fn from_epoch_ms(epoch_ms: i64) -> Timestamp {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{from_epoch_ms, truncate_to_millis, Clock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn truncate_drops_sub_millisecond_part() {
        let precise = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_millis(precise);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn system_clock_reports_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn from_epoch_ms_roundtrips() {
        assert_eq!(from_epoch_ms(86_400_000).timestamp_millis(), 86_400_000);
    }
}
