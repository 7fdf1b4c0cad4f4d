use thiserror::Error;

use crate::UtcDateTime;

/// Validation and contract errors exposed by `blockfeed-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("timestamp is not valid RFC3339: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("timestamp year {year} is outside the RFC3339 range")]
    TimestampOutOfRange { year: i32 },
    #[error("unix timestamp {seconds} is outside the RFC3339 range")]
    UnixTimestampOutOfRange { seconds: i64 },

    #[error("block window begin {begin} must be before end {end}")]
    InvalidWindow { begin: UtcDateTime, end: UtcDateTime },
    #[error("window [{begin}, {end}) is not contained in trades block window [{outer_begin}, {outer_end})")]
    WindowNotContained {
        begin: UtcDateTime,
        end: UtcDateTime,
        outer_begin: UtcDateTime,
        outer_end: UtcDateTime,
    },
    #[error("aggregation window must be at least one second")]
    ZeroWindow,
    #[error("block window starting at {begin} ends past year 9999")]
    WindowOverflow { begin: UtcDateTime },
    #[error("max_empty_blocks must be at least one when empty blocks are emitted")]
    ZeroEmptyBlockLimit,

    #[error("orderbook instrument '{datum}' does not match option '{meta}'")]
    InstrumentMismatch { meta: String, datum: String },
    #[error("forward legs must be one call and one put, strike and expiry must match")]
    MismatchedLegs,
}

/// Top-level error type for codec and aggregation operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("malformed payload: {reason}")]
    Malformed { reason: String },

    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("trade at {time} falls outside block window [{begin}, {end})")]
    OutOfWindow {
        time: UtcDateTime,
        begin: UtcDateTime,
        end: UtcDateTime,
    },

    #[error("{field} declares {declared} entries but {actual} are present")]
    CountMismatch {
        field: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("gap of {windows} empty windows exceeds the limit of {max}")]
    EmptyGapTooLarge { windows: u64, max: u64 },

    #[error("encoding failed: {reason}")]
    Encode { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed {
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_are_malformed() {
        let error = serde_json::from_str::<serde_json::Value>("{not json")
            .expect_err("must fail");
        assert!(matches!(CoreError::from(error), CoreError::Malformed { .. }));
    }

    #[test]
    fn validation_errors_pass_through() {
        let error = CoreError::from(ValidationError::ZeroWindow);
        assert_eq!(
            error.to_string(),
            "aggregation window must be at least one second"
        );
    }
}
