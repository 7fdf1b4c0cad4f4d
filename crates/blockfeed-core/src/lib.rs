//! Core data model for blockfeed.
//!
//! This crate contains:
//! - Canonical market-data records (trades, supply, pairs, options, CVI)
//! - Byte codecs for records and blocks, including the option metadata codec
//! - Time-windowed trades and filters blocks and the streaming aggregator
//! - Structured errors

pub mod block;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;

pub use block::{
    BlockHash, BlockHasher, BlockWindow, FiltersBlock, FiltersBlockData, TradesBlock,
    TradesBlockAggregator, TradesBlockData,
};
pub use codec::{Codec, JsonRecord};
pub use config::AggregatorConfig;
pub use domain::{
    active_pairs, dedup_pairs, CviDataPoint, FilterPoint, OptionMeta, OptionMetaForward,
    OptionMetaIndex, OptionOrderbookDatum, OptionType, Pair, Pairs, Supply, Trade, UtcDateTime,
};
pub use error::{CoreError, ValidationError};
