//! Serde adapter for `chrono::Duration` fields
//!
//! `chrono::Duration` carries no serde impls; configurations persist their
//! durations as whole milliseconds, matching the millisecond granularity
//! used everywhere else in the pipeline. Use via
//! `#[serde(with = "thermocal_core::duration_ms")]`.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    duration.num_milliseconds().serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    i64::deserialize(deserializer).map(Duration::milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "crate::duration_ms")]
        window: Duration,
    }

    #[test]
    fn test_duration_round_trips_as_milliseconds() {
        let holder = Holder {
            window: Duration::minutes(10),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"window":600000}"#);
        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holder);
    }
}
