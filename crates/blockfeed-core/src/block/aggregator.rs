use tracing::{debug, warn};

use super::{BlockWindow, TradesBlockData};
use crate::{AggregatorConfig, CoreError, Trade, ValidationError};

/// Splits a trade stream into consecutive, epoch-aligned block windows.
///
/// Trades must arrive in non-decreasing window order: a trade belonging to a
/// window that has already been closed is rejected, never dropped silently.
#[derive(Debug)]
pub struct TradesBlockAggregator {
    config: AggregatorConfig,
    window: Option<BlockWindow>,
    pending: Vec<Trade>,
}

impl TradesBlockAggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            window: None,
            pending: Vec::new(),
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn current_window(&self) -> Option<BlockWindow> {
        self.window
    }

    pub fn pending_trades(&self) -> usize {
        self.pending.len()
    }

    /// Adds a trade and returns the blocks its arrival closed, oldest first.
    ///
    /// On error the aggregator is left as it was: the open window and its
    /// pending trades survive.
    pub fn push(&mut self, trade: Trade) -> Result<Vec<TradesBlockData>, CoreError> {
        let Some(window) = self.window else {
            self.window = Some(BlockWindow::aligned(trade.time, self.config.window())?);
            self.pending.push(trade);
            return Ok(Vec::new());
        };

        if window.contains(trade.time) {
            self.pending.push(trade);
            return Ok(Vec::new());
        }

        if trade.time < window.begin() {
            warn!(
                time = %trade.time,
                window = %window,
                source = trade.source.as_str(),
                "late trade rejected"
            );
            return Err(CoreError::OutOfWindow {
                time: trade.time,
                begin: window.begin(),
                end: window.end(),
            });
        }

        let next = BlockWindow::aligned(trade.time, self.config.window())?;
        let empty = if self.config.emit_empty_blocks {
            self.empty_blocks(window, next)?
        } else {
            Vec::new()
        };

        let mut closed = Vec::with_capacity(empty.len() + 1);
        if let Some(block) = self.close(window)? {
            closed.push(block);
        }
        closed.extend(empty);

        debug!(window = %next, closed = closed.len(), "aggregation window rolled");
        self.window = Some(next);
        self.pending.push(trade);
        Ok(closed)
    }

    /// Closes the open window, if any, and resets the aggregator.
    pub fn flush(&mut self) -> Result<Option<TradesBlockData>, CoreError> {
        let Some(window) = self.window else {
            return Ok(None);
        };

        let block = self.close(window)?;
        self.window = None;
        Ok(block)
    }

    /// Empty blocks for the windows strictly between `last` and `next`.
    fn empty_blocks(
        &self,
        last: BlockWindow,
        next: BlockWindow,
    ) -> Result<Vec<TradesBlockData>, CoreError> {
        let length = last.length().whole_seconds().max(1);
        let skipped = (next.begin().unix_timestamp() - last.end().unix_timestamp()) / length;
        let skipped = u64::try_from(skipped).unwrap_or(0);

        let max = self.config.max_empty_blocks;
        if skipped > max {
            warn!(windows = skipped, max, from = %last, to = %next, "empty window gap too large");
            return Err(CoreError::EmptyGapTooLarge {
                windows: skipped,
                max,
            });
        }

        let mut blocks = Vec::new();
        let mut window = last;
        for _ in 0..skipped {
            window = window.next()?;
            blocks.push(TradesBlockData::new(window, Vec::new())?);
        }
        Ok(blocks)
    }

    fn close(&mut self, window: BlockWindow) -> Result<Option<TradesBlockData>, CoreError> {
        if self.pending.is_empty() && !self.config.emit_empty_blocks {
            return Ok(None);
        }

        // Pending trades were admitted by `window.contains`, so this check holds.
        let block = TradesBlockData::new(window, std::mem::take(&mut self.pending))?;
        Ok(Some(block))
    }
}
