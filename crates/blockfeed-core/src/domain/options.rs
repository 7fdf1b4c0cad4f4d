use std::fmt::{Display, Formatter};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::records::{non_empty, require_text, validate_finite};
use crate::{UtcDateTime, ValidationError};

/// Option contract side, carried on the wire as `1` (call) or `2` (put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl OptionType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Call => 1,
            Self::Put => 2,
        }
    }

    /// Lenient mapping: `2` is a put, every other code is treated as a call.
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Put,
            _ => Self::Call,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl Display for OptionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OptionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for OptionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OptionTypeVisitor)
    }
}

struct OptionTypeVisitor;

impl<'de> Visitor<'de> for OptionTypeVisitor {
    type Value = OptionType;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a numeric option type code")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(OptionType::from_code(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(OptionType::from_code(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // Saturating cast, truncated toward zero.
        Ok(OptionType::from_code(value as i64))
    }
}

/// Top-of-book snapshot for one option instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionOrderbookDatum {
    pub instrument_name: String,
    pub observation_time: UtcDateTime,
    pub ask_price: f64,
    pub bid_price: f64,
    pub ask_size: f64,
    pub bid_size: f64,
}

impl OptionOrderbookDatum {
    pub fn new(
        instrument_name: impl Into<String>,
        observation_time: UtcDateTime,
        ask_price: f64,
        bid_price: f64,
        ask_size: f64,
        bid_size: f64,
    ) -> Result<Self, ValidationError> {
        validate_finite("ask_price", ask_price)?;
        validate_finite("bid_price", bid_price)?;
        validate_finite("ask_size", ask_size)?;
        validate_finite("bid_size", bid_size)?;

        Ok(Self {
            instrument_name: non_empty("instrument_name", instrument_name.into())?,
            observation_time,
            ask_price,
            bid_price,
            ask_size,
            bid_size,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_finite("ask_price", self.ask_price)?;
        validate_finite("bid_price", self.bid_price)?;
        validate_finite("ask_size", self.ask_size)?;
        validate_finite("bid_size", self.bid_size)?;
        require_text("instrument_name", &self.instrument_name)
    }
}

/// Static contract metadata of an option instrument.
///
/// Encoded through its own codec (see [`crate::codec`]); the expiration only
/// survives encoding with whole-second precision.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionMeta {
    pub instrument_name: String,
    pub base_currency: String,
    pub expiration_time: UtcDateTime,
    pub strike_price: f64,
    pub option_type: OptionType,
}

impl OptionMeta {
    pub fn new(
        instrument_name: impl Into<String>,
        base_currency: impl Into<String>,
        expiration_time: UtcDateTime,
        strike_price: f64,
        option_type: OptionType,
    ) -> Result<Self, ValidationError> {
        validate_finite("strike_price", strike_price)?;

        Ok(Self {
            instrument_name: non_empty("instrument_name", instrument_name.into())?,
            base_currency: base_currency.into(),
            expiration_time,
            strike_price,
            option_type,
        })
    }
}

/// Option metadata joined with its latest orderbook snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionMetaIndex {
    pub meta: OptionMeta,
    pub orderbook: OptionOrderbookDatum,
}

impl OptionMetaIndex {
    pub fn join(
        meta: OptionMeta,
        orderbook: OptionOrderbookDatum,
    ) -> Result<Self, ValidationError> {
        if meta.instrument_name != orderbook.instrument_name {
            return Err(ValidationError::InstrumentMismatch {
                meta: meta.instrument_name,
                datum: orderbook.instrument_name,
            });
        }

        Ok(Self { meta, orderbook })
    }
}

/// Forward curve point synthesized from a call and a put sharing strike and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionMetaForward {
    pub generalized_instrument_name: String,
    pub strike_price: f64,
    /// Bid price of the call leg.
    pub call_price: f64,
    /// Bid price of the put leg.
    pub put_price: f64,
    pub expiration_time: UtcDateTime,
}

impl OptionMetaForward {
    pub fn from_legs(
        call: &OptionMetaIndex,
        put: &OptionMetaIndex,
    ) -> Result<Self, ValidationError> {
        let legs_match = call.meta.option_type == OptionType::Call
            && put.meta.option_type == OptionType::Put
            && call.meta.strike_price == put.meta.strike_price
            && call.meta.expiration_time == put.meta.expiration_time;
        if !legs_match {
            return Err(ValidationError::MismatchedLegs);
        }

        Ok(Self {
            generalized_instrument_name: generalize_instrument_name(&call.meta.instrument_name),
            strike_price: call.meta.strike_price,
            call_price: call.orderbook.bid_price,
            put_price: put.orderbook.bid_price,
            expiration_time: call.meta.expiration_time,
        })
    }

    /// Put-call parity forward, ignoring discounting.
    pub fn implied_forward(&self) -> f64 {
        self.strike_price + self.call_price - self.put_price
    }
}

fn generalize_instrument_name(name: &str) -> String {
    name.strip_suffix("-C")
        .or_else(|| name.strip_suffix("-P"))
        .unwrap_or(name)
        .to_owned()
}
