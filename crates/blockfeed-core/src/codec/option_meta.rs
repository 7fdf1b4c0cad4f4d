use std::fmt::{self, Formatter};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use super::Codec;
use crate::{CoreError, OptionMeta, OptionType, UtcDateTime};

/// Flat interchange form written by the encoder.
#[derive(Serialize)]
struct OptionMetaWire<'a> {
    instrumentname: &'a str,
    basecurrency: &'a str,
    expirationtime: String,
    strikeprice: f64,
    optiontype: OptionType,
}

/// Known payload keys, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionMetaField {
    StrikePrice,
    InstrumentName,
    BaseCurrency,
    OptionType,
    ExpirationTime,
}

impl OptionMetaField {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "strikeprice" => Some(Self::StrikePrice),
            "instrumentname" => Some(Self::InstrumentName),
            "basecurrency" => Some(Self::BaseCurrency),
            "optiontype" => Some(Self::OptionType),
            "expirationtime" => Some(Self::ExpirationTime),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::StrikePrice => "strikeprice",
            Self::InstrumentName => "instrumentname",
            Self::BaseCurrency => "basecurrency",
            Self::OptionType => "optiontype",
            Self::ExpirationTime => "expirationtime",
        }
    }

    fn assign(self, meta: &mut OptionMeta, value: &Value) -> Result<(), CoreError> {
        match self {
            Self::StrikePrice => meta.strike_price = self.number(value)?,
            Self::InstrumentName => meta.instrument_name = self.string(value)?.to_owned(),
            Self::BaseCurrency => meta.base_currency = self.string(value)?.to_owned(),
            Self::OptionType => {
                let code = self.number(value)?.trunc() as i64;
                if code != 1 && code != 2 {
                    warn!(code, "unknown option type code, treating as call");
                }
                meta.option_type = OptionType::from_code(code);
            }
            Self::ExpirationTime => {
                let raw = self.string(value)?;
                meta.expiration_time =
                    UtcDateTime::parse_normalized(raw).map_err(|error| CoreError::Malformed {
                        reason: format!("{}: {error}", self.name()),
                    })?;
            }
        }
        Ok(())
    }

    fn number(self, value: &Value) -> Result<f64, CoreError> {
        value.as_f64().ok_or_else(|| self.mismatch("number", value))
    }

    fn string(self, value: &Value) -> Result<&str, CoreError> {
        value.as_str().ok_or_else(|| self.mismatch("string", value))
    }

    fn mismatch(self, expected: &'static str, value: &Value) -> CoreError {
        CoreError::TypeMismatch {
            field: self.name(),
            expected,
            found: value_kind(value),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Object entries in payload order, duplicates included.
struct PayloadEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for PayloadEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = PayloadEntries;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("an option metadata object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(5));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(PayloadEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl Codec for OptionMeta {
    fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let wire = OptionMetaWire {
            instrumentname: &self.instrument_name,
            basecurrency: &self.base_currency,
            expirationtime: self.expiration_time.truncate_to_seconds().format_rfc3339()?,
            strikeprice: self.strike_price,
            optiontype: self.option_type,
        };

        serde_json::to_vec(&wire).map_err(|error| CoreError::Encode {
            reason: error.to_string(),
        })
    }

    /// Later entries overwrite earlier ones, so the last case variant of a key wins.
    fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let PayloadEntries(entries) = serde_json::from_slice::<PayloadEntries>(bytes).map_err(|error| {
            error!(%error, "option metadata payload is not a JSON object");
            CoreError::from(error)
        })?;

        let mut meta = OptionMeta {
            instrument_name: String::new(),
            base_currency: String::new(),
            expiration_time: UtcDateTime::ZERO,
            strike_price: 0.0,
            option_type: OptionType::Call,
        };

        for (key, value) in &entries {
            let Some(field) = OptionMetaField::from_key(key) else {
                continue;
            };
            field.assign(&mut meta, value).inspect_err(|error| {
                error!(%error, key = key.as_str(), "option metadata decode failed");
            })?;
        }

        Ok(meta)
    }
}
