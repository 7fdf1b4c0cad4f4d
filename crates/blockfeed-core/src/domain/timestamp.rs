use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::ValidationError;

// RFC 3339 only covers four-digit, non-negative years.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    /// Value assigned when a payload omits a timestamp.
    pub const ZERO: Self = Self(datetime!(0001-01-01 0:00 UTC));

    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parses a timestamp that must already carry the `Z`/`+00:00` offset.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed).map_err(|_| ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        })
    }

    /// Parses any RFC3339 timestamp and converts it to UTC.
    pub fn parse_normalized(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed.to_offset(UtcOffset::UTC))
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, ValidationError> {
        if value.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: value
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            });
        }

        if !(MIN_YEAR..=MAX_YEAR).contains(&value.year()) {
            return Err(ValidationError::TimestampOutOfRange { year: value.year() });
        }

        Ok(Self(value))
    }

    pub fn from_unix_timestamp(seconds: i64) -> Result<Self, ValidationError> {
        let value = OffsetDateTime::from_unix_timestamp(seconds)
            .map_err(|_| ValidationError::UnixTimestampOutOfRange { seconds })?;
        Self::from_offset_datetime(value)
    }

    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Drops the sub-second part.
    pub fn truncate_to_seconds(self) -> Self {
        Self(self.0.replace_nanosecond(0).unwrap_or(self.0))
    }

    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        self.0
            .checked_add(duration)
            .and_then(|value| Self::from_offset_datetime(value).ok())
    }

    pub fn format_rfc3339(self) -> Result<String, ValidationError> {
        self.0
            .format(&Rfc3339)
            .map_err(|_| ValidationError::TimestampOutOfRange {
                year: self.0.year(),
            })
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.format_rfc3339().map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.format_rfc3339().map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamp() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("must parse");
        assert_eq!(
            parsed.format_rfc3339().expect("formattable"),
            "2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn rejects_non_utc_timestamp() {
        let err = UtcDateTime::parse("2024-01-01T01:00:00+01:00").expect_err("must fail");
        assert!(matches!(err, ValidationError::TimestampNotUtc { .. }));
    }

    #[test]
    fn normalizes_offset_timestamp() {
        let parsed = UtcDateTime::parse_normalized("2024-01-01T01:00:00+01:00").expect("must parse");
        assert_eq!(parsed.to_string(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn keeps_sub_second_precision() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00.123456789Z").expect("must parse");
        assert_eq!(parsed.to_string(), "2024-01-01T00:00:00.123456789Z");
        assert_eq!(parsed.truncate_to_seconds().to_string(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = UtcDateTime::parse_normalized("15/01/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn out_of_range_epoch_reports_seconds() {
        let err = UtcDateTime::from_unix_timestamp(i64::MAX).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::UnixTimestampOutOfRange { seconds: i64::MAX }
        );
    }
}
