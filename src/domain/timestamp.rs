//! Wall-clock timestamps shared by every entity.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A point in time in UTC.
///
/// Serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: reads the system clock. Domain functions take `now` as an
    /// argument instead of calling this.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the timestamp `delta` earlier, saturating at the minimum
    /// representable time.
    #[must_use]
    pub fn saturating_sub(self, delta: TimeDelta) -> Self {
        Self(
            self.0
                .checked_sub_signed(delta)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn test_saturating_sub_moves_backwards() {
        let now = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
        let earlier = now.saturating_sub(TimeDelta::days(7));
        assert_eq!(
            earlier.as_datetime(),
            &Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap()
        );
    }

    #[rstest]
    fn test_saturating_sub_clamps_at_minimum() {
        let minimum = Timestamp::from_datetime(DateTime::<Utc>::MIN_UTC);
        assert_eq!(minimum.saturating_sub(TimeDelta::days(1)), minimum);
    }

    #[rstest]
    fn test_serializes_as_rfc3339_string() {
        let timestamp =
            Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let json = serde_json::to_string(&timestamp).unwrap();
        assert_eq!(json, "\"2024-01-02T03:04:05Z\"");
    }
}
