use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{CoreError, UtcDateTime, ValidationError};

/// Half-open time window `[begin, end)` covered by a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct BlockWindow {
    #[serde(rename = "BeginTime")]
    begin: UtcDateTime,
    #[serde(rename = "EndTime")]
    end: UtcDateTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WindowBounds {
    begin_time: UtcDateTime,
    end_time: UtcDateTime,
}

impl TryFrom<WindowBounds> for BlockWindow {
    type Error = ValidationError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.begin_time, bounds.end_time)
    }
}

impl BlockWindow {
    pub fn new(begin: UtcDateTime, end: UtcDateTime) -> Result<Self, ValidationError> {
        if begin >= end {
            return Err(ValidationError::InvalidWindow { begin, end });
        }

        Ok(Self { begin, end })
    }

    /// Window of `length` whole seconds containing `time`, aligned on the Unix epoch.
    pub fn aligned(time: UtcDateTime, length: Duration) -> Result<Self, ValidationError> {
        let length = length.whole_seconds();
        if length < 1 {
            return Err(ValidationError::ZeroWindow);
        }

        let start = time.unix_timestamp().div_euclid(length) * length;
        let begin = UtcDateTime::from_unix_timestamp(start)?;
        let end = start
            .checked_add(length)
            .and_then(|end| UtcDateTime::from_unix_timestamp(end).ok())
            .ok_or(ValidationError::WindowOverflow { begin })?;

        Self::new(begin, end)
    }

    pub fn begin(&self) -> UtcDateTime {
        self.begin
    }

    pub fn end(&self) -> UtcDateTime {
        self.end
    }

    pub fn length(&self) -> Duration {
        self.end.into_inner() - self.begin.into_inner()
    }

    pub fn contains(&self, time: UtcDateTime) -> bool {
        self.begin <= time && time < self.end
    }

    pub fn contains_window(&self, other: &Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Fails with [`CoreError::OutOfWindow`] unless `time` lies in the window.
    pub fn check(&self, time: UtcDateTime) -> Result<(), CoreError> {
        if self.contains(time) {
            return Ok(());
        }

        Err(CoreError::OutOfWindow {
            time,
            begin: self.begin,
            end: self.end,
        })
    }

    /// The adjacent window of the same length.
    pub fn next(&self) -> Result<Self, ValidationError> {
        let end = self
            .end
            .checked_add(self.length())
            .ok_or(ValidationError::WindowOverflow { begin: self.end })?;
        Self::new(self.end, end)
    }
}

impl Display for BlockWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> UtcDateTime {
        UtcDateTime::parse(value).expect("timestamp")
    }

    #[test]
    fn end_is_exclusive() {
        let window = BlockWindow::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T01:00:00Z"))
            .expect("valid window");

        assert!(window.contains(ts("2024-01-01T00:00:00Z")));
        assert!(window.contains(ts("2024-01-01T00:59:59.999999999Z")));
        assert!(!window.contains(ts("2024-01-01T01:00:00Z")));
        assert!(!window.contains(ts("2023-12-31T23:59:59Z")));
    }

    #[test]
    fn rejects_empty_window() {
        let err = BlockWindow::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T00:00:00Z"))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidWindow { .. }));
    }

    #[test]
    fn aligns_on_epoch() {
        let window = BlockWindow::aligned(ts("2024-01-01T00:03:10.5Z"), Duration::minutes(2))
            .expect("valid window");

        assert_eq!(window.begin(), ts("2024-01-01T00:02:00Z"));
        assert_eq!(window.end(), ts("2024-01-01T00:04:00Z"));

        let next = window.next().expect("next window");
        assert_eq!(next.begin(), window.end());
        assert_eq!(next.length(), Duration::minutes(2));
    }

    #[test]
    fn rejects_sub_second_length() {
        let err = BlockWindow::aligned(ts("2024-01-01T00:00:00Z"), Duration::milliseconds(500))
            .expect_err("must fail");
        assert_eq!(err, ValidationError::ZeroWindow);
    }

    #[test]
    fn inverted_bounds_do_not_deserialize() {
        let result = serde_json::from_str::<BlockWindow>(
            r#"{"BeginTime":"2024-01-01T01:00:00Z","EndTime":"2024-01-01T00:00:00Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn window_past_year_9999_overflows() {
        let last = BlockWindow::new(ts("9999-12-31T23:58:00Z"), ts("9999-12-31T23:59:00Z"))
            .expect("valid window");

        let err = last.next().expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::WindowOverflow {
                begin: ts("9999-12-31T23:59:00Z")
            }
        );

        let err = BlockWindow::aligned(ts("9999-12-31T23:59:30Z"), Duration::minutes(1))
            .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::WindowOverflow {
                begin: ts("9999-12-31T23:59:00Z")
            }
        );
    }

    #[test]
    fn containment() {
        let outer = BlockWindow::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T01:00:00Z"))
            .expect("valid window");
        let inner = BlockWindow::new(ts("2024-01-01T00:10:00Z"), ts("2024-01-01T01:00:00Z"))
            .expect("valid window");

        assert!(outer.contains_window(&inner));
        assert!(outer.contains_window(&outer));
        assert!(!inner.contains_window(&outer));
    }
}
