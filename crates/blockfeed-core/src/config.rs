use serde::{Deserialize, Serialize};
use time::Duration;

use crate::ValidationError;

/// Settings for [`TradesBlockAggregator`](crate::TradesBlockAggregator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Block window length in seconds.
    pub window_secs: u64,
    /// Emit blocks for windows that saw no trades.
    pub emit_empty_blocks: bool,
    /// Largest run of empty blocks a single trade may close.
    pub max_empty_blocks: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            window_secs: 120,
            emit_empty_blocks: false,
            max_empty_blocks: 1_440,
        }
    }
}

impl AggregatorConfig {
    pub fn window(&self) -> Duration {
        Duration::seconds(i64::try_from(self.window_secs).unwrap_or(i64::MAX))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window_secs == 0 {
            return Err(ValidationError::ZeroWindow);
        }
        if self.emit_empty_blocks && self.max_empty_blocks == 0 {
            return Err(ValidationError::ZeroEmptyBlockLimit);
        }
        Ok(())
    }
}
