use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_count, BlockHash, BlockHasher, BlockWindow};
use crate::codec::{Codec, JsonRecord};
use crate::{CoreError, Trade, UtcDateTime};

/// Trades collected over one block window, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradesBlockData {
    #[serde(flatten)]
    window: BlockWindow,
    trades_number: usize,
    trades: Vec<Trade>,
}

impl TradesBlockData {
    /// Builds block data, rejecting any trade outside `window`.
    pub fn new(window: BlockWindow, trades: Vec<Trade>) -> Result<Self, CoreError> {
        for trade in &trades {
            window.check(trade.time)?;
        }

        debug!(window = %window, trades = trades.len(), "trades block data assembled");

        Ok(Self {
            window,
            trades_number: trades.len(),
            trades,
        })
    }

    pub fn window(&self) -> BlockWindow {
        self.window
    }

    pub fn begin_time(&self) -> UtcDateTime {
        self.window.begin()
    }

    pub fn end_time(&self) -> UtcDateTime {
        self.window.end()
    }

    pub fn trades_number(&self) -> usize {
        self.trades_number
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

impl JsonRecord for TradesBlockData {
    fn verify(&self) -> Result<(), CoreError> {
        check_count("TradesNumber", self.trades_number, self.trades.len())?;
        for trade in &self.trades {
            self.window.check(trade.time)?;
            trade.validate()?;
        }
        Ok(())
    }
}

/// Hash-identified, immutable trades block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradesBlock {
    block_hash: BlockHash,
    trades_block_data: TradesBlockData,
}

impl TradesBlock {
    pub fn new(block_hash: BlockHash, trades_block_data: TradesBlockData) -> Self {
        Self {
            block_hash,
            trades_block_data,
        }
    }

    /// Hashes the canonical encoding of `data` and wraps it into a block.
    pub fn seal(data: TradesBlockData, hasher: &impl BlockHasher) -> Result<Self, CoreError> {
        let canonical = data.encode()?;
        let block_hash = BlockHash::new(hasher.hash_block(&canonical))?;

        debug!(
            hash = %block_hash,
            window = %data.window(),
            trades = data.trades_number(),
            "trades block sealed"
        );

        Ok(Self::new(block_hash, data))
    }

    pub fn block_hash(&self) -> &BlockHash {
        &self.block_hash
    }

    pub fn data(&self) -> &TradesBlockData {
        &self.trades_block_data
    }

    pub fn window(&self) -> BlockWindow {
        self.trades_block_data.window()
    }
}

impl JsonRecord for TradesBlock {
    fn verify(&self) -> Result<(), CoreError> {
        self.trades_block_data.verify()
    }
}
