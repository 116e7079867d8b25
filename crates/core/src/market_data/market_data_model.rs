//! Market data domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which feed a symbol is priced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetClass {
    LocalEquity,
    ForeignEquity,
    Crypto,
}

/// The two cross rates the portfolio is converted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RatePair {
    /// Foreign currency to local currency
    ForeignToLocal,
    /// Stablecoin to local currency
    StablecoinToLocal,
}

impl fmt::Display for RatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatePair::ForeignToLocal => f.write_str("foreignToLocal"),
            RatePair::StablecoinToLocal => f.write_str("stablecoinToLocal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of a refresh. Symbols in `unchanged` and `failed` kept their
/// previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshReport {
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub failed: Vec<RefreshFailure>,
    /// Position store version after the refresh
    pub state_version: u64,
}

impl PriceRefreshReport {
    /// True when any value is stale because its lookup failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
