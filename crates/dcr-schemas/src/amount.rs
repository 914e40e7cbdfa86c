//! Amount encoding at the JSON boundary.
//!
//! Inbound amounts arrive as JSON numbers or strings depending on which
//! page produced them. [`RawAmount`] keeps the textual form unvalidated so
//! that conversion can fail per order with its index attached. Outbound
//! amounts are [`WireMoney`]: an integer when whole, otherwise a two-decimal
//! number. Neither direction goes through `f64`.

use std::str::FromStr;

use dcr_revenue::{Money, RevenueError};
use serde::de::{self, Deserializer};
use serde::ser;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

/// Unvalidated inbound amount text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAmount(pub String);

impl RawAmount {
    pub fn parse(&self) -> Result<Money, RevenueError> {
        Money::parse_decimal(&self.0)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount(s.to_string())
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // serde_json's arbitrary_precision keeps numbers as their source text.
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(RawAmount(s)),
            Value::Number(n) => Ok(RawAmount(n.to_string())),
            other => Err(de::Error::custom(format!(
                "expected a decimal amount as a number or string, got {other}"
            ))),
        }
    }
}

impl Serialize for RawAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Outbound amount.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WireMoney(pub Money);

impl Serialize for WireMoney {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_whole_taka() {
            serializer.serialize_i64(self.0.minor() / dcr_revenue::MINOR_PER_TAKA)
        } else {
            let n = Number::from_str(&self.0.to_string()).map_err(ser::Error::custom)?;
            n.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for WireMoney {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAmount::deserialize(deserializer)?;
        raw.parse().map(WireMoney).map_err(de::Error::custom)
    }
}

impl From<Money> for WireMoney {
    fn from(m: Money) -> Self {
        WireMoney(m)
    }
}
