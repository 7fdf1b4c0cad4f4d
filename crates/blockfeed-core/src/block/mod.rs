//! Time-windowed, hash-identified blocks of trades and filter values.
//!
//! Block data is built once from a finished collection and never mutated.
//! Hashing is delegated to a [`BlockHasher`] fed with the canonical encoding
//! of the data; the returned identity wraps the data into a
//! [`TradesBlock`] or [`FiltersBlock`].

mod aggregator;
mod filters;
mod hash;
mod trades;
mod window;

pub use aggregator::TradesBlockAggregator;
pub use filters::{FiltersBlock, FiltersBlockData};
pub use hash::{BlockHash, BlockHasher};
pub use trades::{TradesBlock, TradesBlockData};
pub use window::BlockWindow;

use crate::CoreError;

/// Count fields are checksums over the collection they describe.
fn check_count(field: &'static str, declared: usize, actual: usize) -> Result<(), CoreError> {
    if declared != actual {
        return Err(CoreError::CountMismatch {
            field,
            declared,
            actual,
        });
    }
    Ok(())
}
