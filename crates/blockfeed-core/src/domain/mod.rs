//! # Domain Models
//!
//! Canonical record types of the market-data pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Trade`] | Executed trade, signed volume |
//! | [`Supply`] | Circulating supply observation |
//! | [`Pair`] / [`Pairs`] | Symbol to exchange pair mapping |
//! | [`OptionOrderbookDatum`] | Option top-of-book snapshot |
//! | [`OptionMeta`] | Option contract metadata |
//! | [`OptionMetaIndex`] | Metadata joined with its orderbook |
//! | [`OptionMetaForward`] | Forward point built from a call and a put |
//! | [`CviDataPoint`] | Volatility index point |
//! | [`FilterPoint`] | Indicator value derived from a trades window |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Constructors validate numeric fields (finite values only) and required
//! identifiers. Fields stay public; records are plain values and are not
//! mutated after construction. The one post-construction update, price
//! enrichment, goes through [`Trade::with_estimated_usd_price`] and yields a
//! new trade.

mod options;
mod records;
mod timestamp;

pub use options::{
    OptionMeta, OptionMetaForward, OptionMetaIndex, OptionOrderbookDatum, OptionType,
};
pub use records::{active_pairs, dedup_pairs, CviDataPoint, FilterPoint, Pair, Pairs, Supply, Trade};
pub use timestamp::UtcDateTime;
