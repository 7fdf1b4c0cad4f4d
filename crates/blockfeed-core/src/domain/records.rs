use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// Executed trade as reported by an exchange or on-chain source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trade {
    pub symbol: String,
    pub pair: String,
    pub price: f64,
    /// Negative when the trade was a market sell.
    pub volume: f64,
    pub time: UtcDateTime,
    #[serde(rename = "ForeignTradeID")]
    pub foreign_trade_id: String,
    /// Zero until the price enrichment step has run.
    #[serde(rename = "EstimatedUSDPrice")]
    pub estimated_usd_price: f64,
    pub source: String,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        pair: impl Into<String>,
        price: f64,
        volume: f64,
        time: UtcDateTime,
        foreign_trade_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate_finite("price", price)?;
        validate_finite("volume", volume)?;

        Ok(Self {
            symbol: non_empty("symbol", symbol.into())?,
            pair: pair.into(),
            price,
            volume,
            time,
            foreign_trade_id: foreign_trade_id.into(),
            estimated_usd_price: 0.0,
            source: non_empty("source", source.into())?,
        })
    }

    /// Returns a copy of the trade carrying the enriched USD price.
    pub fn with_estimated_usd_price(self, price: f64) -> Result<Self, ValidationError> {
        validate_finite("estimated_usd_price", price)?;
        Ok(Self {
            estimated_usd_price: price,
            ..self
        })
    }

    /// Re-runs the constructor checks on a value built elsewhere, e.g. decoded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_finite("price", self.price)?;
        validate_finite("volume", self.volume)?;
        validate_finite("estimated_usd_price", self.estimated_usd_price)?;
        require_text("symbol", &self.symbol)?;
        require_text("source", &self.source)
    }

    pub fn is_sell(&self) -> bool {
        self.volume < 0.0
    }
}

/// Circulating supply observation keyed by symbol, source and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Supply {
    pub symbol: String,
    pub name: String,
    pub circulating_supply: f64,
    pub source: String,
    pub time: UtcDateTime,
    /// Chain height of the observation, zero when not applicable.
    pub block: i64,
}

impl Supply {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        circulating_supply: f64,
        source: impl Into<String>,
        time: UtcDateTime,
        block: i64,
    ) -> Result<Self, ValidationError> {
        validate_finite("circulating_supply", circulating_supply)?;

        Ok(Self {
            symbol: non_empty("symbol", symbol.into())?,
            name: name.into(),
            circulating_supply,
            source: non_empty("source", source.into())?,
            time,
            block,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_finite("circulating_supply", self.circulating_supply)?;
        require_text("symbol", &self.symbol)?;
        require_text("source", &self.source)
    }
}

/// Mapping of a symbol to its exchange-specific pair name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pair {
    pub symbol: String,
    pub foreign_name: String,
    pub exchange: String,
    /// Excluded from downstream aggregation when set.
    pub ignore: bool,
}

impl Pair {
    pub fn new(
        symbol: impl Into<String>,
        foreign_name: impl Into<String>,
        exchange: impl Into<String>,
        ignore: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            foreign_name: foreign_name.into(),
            exchange: exchange.into(),
            ignore,
        }
    }
}

pub type Pairs = Vec<Pair>;

/// Keeps the first pair seen for each `(exchange, foreign_name)`.
pub fn dedup_pairs(pairs: Pairs) -> Pairs {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| seen.insert((pair.exchange.clone(), pair.foreign_name.clone())))
        .collect()
}

pub fn active_pairs(pairs: &[Pair]) -> impl Iterator<Item = &Pair> {
    pairs.iter().filter(|pair| !pair.ignore)
}

/// One point of a volatility index series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CviDataPoint {
    pub timestamp: UtcDateTime,
    pub value: f64,
}

impl CviDataPoint {
    pub fn new(timestamp: UtcDateTime, value: f64) -> Result<Self, ValidationError> {
        validate_finite("value", value)?;
        Ok(Self { timestamp, value })
    }
}

/// Indicator value derived from the trades of a block window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterPoint {
    pub symbol: String,
    pub value: f64,
    pub name: String,
    pub time: UtcDateTime,
}

impl FilterPoint {
    pub fn new(
        symbol: impl Into<String>,
        value: f64,
        name: impl Into<String>,
        time: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_finite("value", value)?;

        Ok(Self {
            symbol: non_empty("symbol", symbol.into())?,
            value,
            name: non_empty("name", name.into())?,
            time,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_finite("value", self.value)?;
        require_text("symbol", &self.symbol)?;
        require_text("name", &self.name)
    }
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

pub(crate) fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    require_text(field, &value)?;
    Ok(value)
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}
