//! Timestamp codec for the `notes.entry_date` column.
//!
//! Dates cross the storage boundary as epoch milliseconds.

use chrono::{DateTime, Utc};

/// Encodes a timestamp for storage as epoch milliseconds.
pub fn timestamp_to_record(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Decodes a stored epoch-milliseconds value.
///
/// Returns `None` when the value is outside the representable date range.
pub fn record_to_timestamp(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
}

#[cfg(test)]
mod tests {
    use super::{record_to_timestamp, timestamp_to_record};
    use chrono::{TimeZone, Utc};

    #[test]
    fn encodes_epoch_millis() {
        let value = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(timestamp_to_record(value), 1_700_000_000_123);
    }

    #[test]
    fn decode_inverts_encode() {
        for millis in [0_i64, 1, -1, 1_700_000_000_123, -62_135_596_800_000] {
            let decoded = record_to_timestamp(millis).expect("value should be in range");
            assert_eq!(timestamp_to_record(decoded), millis);
        }
    }

    #[test]
    fn decode_rejects_out_of_range_values() {
        assert!(record_to_timestamp(i64::MAX).is_none());
        assert!(record_to_timestamp(i64::MIN).is_none());
    }
}
