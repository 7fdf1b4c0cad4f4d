use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_count, BlockHash, BlockHasher, BlockWindow, TradesBlock};
use crate::codec::{Codec, JsonRecord};
use crate::{CoreError, FilterPoint, UtcDateTime, ValidationError};

/// Filter values derived from one trades block.
///
/// Refers to its trades block by hash only; trade data is never copied here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FiltersBlockData {
    trades_block_hash: BlockHash,
    #[serde(flatten)]
    window: BlockWindow,
    filter_points: Vec<FilterPoint>,
    filters_number: usize,
}

impl FiltersBlockData {
    /// `window` must equal or lie inside the trades block window.
    pub fn new(
        trades_block: &TradesBlock,
        window: BlockWindow,
        filter_points: Vec<FilterPoint>,
    ) -> Result<Self, CoreError> {
        let outer = trades_block.window();
        if !outer.contains_window(&window) {
            return Err(ValidationError::WindowNotContained {
                begin: window.begin(),
                end: window.end(),
                outer_begin: outer.begin(),
                outer_end: outer.end(),
            }
            .into());
        }

        debug!(
            trades_block = %trades_block.block_hash(),
            window = %window,
            filters = filter_points.len(),
            "filters block data assembled"
        );

        Ok(Self {
            trades_block_hash: trades_block.block_hash().clone(),
            window,
            filters_number: filter_points.len(),
            filter_points,
        })
    }

    /// Uses the trades block window as is.
    pub fn for_trades_block(
        trades_block: &TradesBlock,
        filter_points: Vec<FilterPoint>,
    ) -> Result<Self, CoreError> {
        Self::new(trades_block, trades_block.window(), filter_points)
    }

    pub fn trades_block_hash(&self) -> &BlockHash {
        &self.trades_block_hash
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

    pub fn filter_points(&self) -> &[FilterPoint] {
        &self.filter_points
    }

    pub fn filters_number(&self) -> usize {
        self.filters_number
    }
}

impl JsonRecord for FiltersBlockData {
    fn verify(&self) -> Result<(), CoreError> {
        check_count("FiltersNumber", self.filters_number, self.filter_points.len())?;
        for point in &self.filter_points {
            point.validate()?;
        }
        Ok(())
    }
}

/// Hash-identified, immutable filters block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FiltersBlock {
    block_hash: BlockHash,
    filters_block_data: FiltersBlockData,
}

impl FiltersBlock {
    pub fn new(block_hash: BlockHash, filters_block_data: FiltersBlockData) -> Self {
        Self {
            block_hash,
            filters_block_data,
        }
    }

    pub fn seal(data: FiltersBlockData, hasher: &impl BlockHasher) -> Result<Self, CoreError> {
        let canonical = data.encode()?;
        let block_hash = BlockHash::new(hasher.hash_block(&canonical))?;

        debug!(
            hash = %block_hash,
            trades_block = %data.trades_block_hash(),
            filters = data.filters_number(),
            "filters block sealed"
        );

        Ok(Self::new(block_hash, data))
    }

    pub fn block_hash(&self) -> &BlockHash {
        &self.block_hash
    }

    pub fn data(&self) -> &FiltersBlockData {
        &self.filters_block_data
    }
}

impl JsonRecord for FiltersBlock {
    fn verify(&self) -> Result<(), CoreError> {
        self.filters_block_data.verify()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::TradesBlockData;

    fn ts(value: &str) -> UtcDateTime {
        UtcDateTime::parse(value).expect("timestamp")
    }

    fn trades_block() -> TradesBlock {
        let window = BlockWindow::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T01:00:00Z"))
            .expect("window");
        let data = TradesBlockData::new(window, Vec::new()).expect("block data");
        TradesBlock::new(BlockHash::new("trades-1").expect("hash"), data)
    }

    fn points() -> Vec<FilterPoint> {
        vec![
            FilterPoint::new("BTC", 42_010.5, "MA120", ts("2024-01-01T01:00:00Z")).expect("point"),
            FilterPoint::new("BTC", 41_998.0, "MEDIR120", ts("2024-01-01T01:00:00Z"))
                .expect("point"),
        ]
    }

    #[test]
    fn references_trades_block_by_hash() {
        let data = FiltersBlockData::for_trades_block(&trades_block(), points()).expect("valid");

        assert_eq!(data.trades_block_hash().as_str(), "trades-1");
        assert_eq!(data.filters_number(), 2);
        assert_eq!(data.window(), trades_block().window());
    }

    #[test]
    fn accepts_sub_window() {
        let window = BlockWindow::new(ts("2024-01-01T00:30:00Z"), ts("2024-01-01T01:00:00Z"))
            .expect("window");
        let data = FiltersBlockData::new(&trades_block(), window, points()).expect("valid");
        assert_eq!(data.begin_time(), ts("2024-01-01T00:30:00Z"));
    }

    #[test]
    fn rejects_window_outside_trades_block() {
        let window = BlockWindow::new(ts("2024-01-01T00:30:00Z"), ts("2024-01-01T01:30:00Z"))
            .expect("window");
        let err = FiltersBlockData::new(&trades_block(), window, points()).expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::WindowNotContained { .. })
        ));
    }

    #[test]
    fn decode_checks_filter_count() {
        let data = FiltersBlockData::for_trades_block(&trades_block(), points()).expect("valid");
        let block = FiltersBlock::new(BlockHash::new("filters-1").expect("hash"), data);

        let mut value = serde_json::to_value(&block).expect("json");
        value["FiltersBlockData"]["FiltersNumber"] = json!(1);

        let err = FiltersBlock::decode(&serde_json::to_vec(&value).expect("json"))
            .expect_err("must fail");
        assert_eq!(
            err,
            CoreError::CountMismatch {
                field: "FiltersNumber",
                declared: 1,
                actual: 2,
            }
        );
    }
}
