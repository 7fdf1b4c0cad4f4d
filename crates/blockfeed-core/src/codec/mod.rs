//! Byte codecs for records and blocks.
//!
//! Every record travels as a UTF-8 JSON object. Most types go through the
//! structural path ([`JsonRecord`]); [`OptionMeta`](crate::OptionMeta) has a
//! hand-written codec in `option_meta`.
//!
//! Codecs hold no state, so independent values can be encoded and decoded
//! from any number of threads at once.

mod option_meta;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    CoreError, CviDataPoint, FilterPoint, OptionMetaForward, OptionOrderbookDatum, Pair, Pairs,
    Supply, Trade,
};

/// Encode/decode contract shared by every persisted value.
pub trait Codec: Sized {
    fn encode(&self) -> Result<Vec<u8>, CoreError>;

    /// Decodes a payload; on error nothing of the payload is returned.
    fn decode(bytes: &[u8]) -> Result<Self, CoreError>;
}

/// Values encoded structurally with their declared field names.
pub trait JsonRecord: Serialize + DeserializeOwned {
    /// Integrity checks run on a freshly parsed value.
    fn verify(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl<T: JsonRecord> Codec for T {
    fn encode(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(|error| CoreError::Encode {
            reason: error.to_string(),
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: Self = serde_json::from_slice(bytes)?;
        value.verify()?;
        Ok(value)
    }
}

impl JsonRecord for Trade {
    fn verify(&self) -> Result<(), CoreError> {
        Ok(self.validate()?)
    }
}

impl JsonRecord for Supply {
    fn verify(&self) -> Result<(), CoreError> {
        Ok(self.validate()?)
    }
}

impl JsonRecord for OptionOrderbookDatum {
    fn verify(&self) -> Result<(), CoreError> {
        Ok(self.validate()?)
    }
}

impl JsonRecord for FilterPoint {
    fn verify(&self) -> Result<(), CoreError> {
        Ok(self.validate()?)
    }
}

impl JsonRecord for Pair {}
impl JsonRecord for Pairs {}
impl JsonRecord for OptionMetaForward {}
impl JsonRecord for CviDataPoint {}
