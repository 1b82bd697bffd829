//! Tickers and Variant Keys
//!
//! A BRC-20 ticker is normalized to uppercase for lookup. Paired with a
//! multiple it forms the variant key that identifies one wrapped-token line:
//!
//! ```text
//! ("ordi", 1)   -> ORDI
//! ("ordi", 100) -> ORDI(x100)
//! ```
//!
//! The base variant (multiple 1) always displays as the bare ticker, so
//! balances recorded before multiples existed stay reachable under the
//! same key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::BridgeError;

/// Normalized BRC-20 ticker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize a raw ticker: trim whitespace and uppercase.
    ///
    /// Brackets and inner whitespace are rejected; they would make the
    /// displayed variant key (`ORDI(x100)`) ambiguous.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty()
            || normalized
                .chars()
                .any(|c| c == '(' || c == ')' || c.is_whitespace())
        {
            return Err(BridgeError::InvalidTicker(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// (ticker, multiple) identity of a wrapped-token line
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantKey {
    ticker: Ticker,
    multiple: u32,
}

impl VariantKey {
    /// Multiple of the base variant
    pub const BASE_MULTIPLE: u32 = 1;

    pub fn new(ticker: &str, multiple: u32) -> Result<Self, BridgeError> {
        if multiple == 0 {
            return Err(BridgeError::InvalidMultiple(format!(
                "multiple must be at least 1 for ticker {}",
                ticker
            )));
        }

        Ok(Self {
            ticker: Ticker::parse(ticker)?,
            multiple,
        })
    }

    /// The base (multiple 1) variant of a ticker
    pub fn base(ticker: &str) -> Result<Self, BridgeError> {
        Self::new(ticker, Self::BASE_MULTIPLE)
    }

    pub fn from_ticker(ticker: Ticker, multiple: u32) -> Result<Self, BridgeError> {
        if multiple == 0 {
            return Err(BridgeError::InvalidMultiple(format!(
                "multiple must be at least 1 for ticker {}",
                ticker
            )));
        }
        Ok(Self { ticker, multiple })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    pub fn is_base(&self) -> bool {
        self.multiple == Self::BASE_MULTIPLE
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "{}", self.ticker)
        } else {
            write!(f, "{}(x{})", self.ticker, self.multiple)
        }
    }
}

impl FromStr for VariantKey {
    type Err = BridgeError;

    /// Parse a displayed key back into its parts (`ORDI`, `ordi(x100)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(body) = trimmed.strip_suffix(')') {
            if let Some(open) = body.rfind("(x").or_else(|| body.rfind("(X")) {
                let multiple = body[open + 2..].parse::<u32>().map_err(|e| {
                    BridgeError::InvalidMultiple(format!("{}: {}", s, e))
                })?;
                return Self::new(&body[..open], multiple);
            }
        }

        Self::base(trimmed)
    }
}

impl TryFrom<String> for VariantKey {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VariantKey> for String {
    fn from(key: VariantKey) -> Self {
        key.to_string()
    }
}
