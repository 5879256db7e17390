use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// The designated time of an event, always held in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build a timestamp from milliseconds since the Unix epoch.
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Whole seconds since the epoch, truncated toward zero.
    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_millis() / 1000
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    /// Parse an RFC 3339 string; any offset is normalised to UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s).map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_truncates() {
        let ts = Timestamp::from_epoch_millis(1_500_000_000_999).unwrap();
        assert_eq!(ts.epoch_seconds(), 1_500_000_000);
    }

    #[test]
    fn test_epoch_seconds_before_epoch_truncates_toward_zero() {
        let ts = Timestamp::from_epoch_millis(-1_500).unwrap();
        assert_eq!(ts.epoch_seconds(), -1);
    }

    #[test]
    fn test_display_is_iso_with_millis() {
        let ts = Timestamp::from_epoch_millis(1_500_000_000_123).unwrap();
        assert_eq!(ts.to_string(), "2017-07-14T02:40:00.123Z");
    }

    #[test]
    fn test_parse_normalises_offset() {
        let ts: Timestamp = "2024-03-01T10:00:00+02:00".parse().unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T08:00:00.000Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("yesterday".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let ts = Timestamp::from_epoch_millis(0).unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"1970-01-01T00:00:00.000Z\""
        );
    }
}
