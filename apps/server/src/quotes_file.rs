//! Price and rate feed backed by a JSON file that an external job keeps
//! up to date:
//!
//! ```json
//! {
//!   "prices": { "localEquity": { "2330": "612.5" }, "crypto": { "BTCUSDT": "67000" } },
//!   "rates": { "foreignToLocal": "32.1" }
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use marginwatch_core::market_data::{AssetClass, FetchError, PriceFeedTrait, RatePair, RateFeedTrait};
use rust_decimal::Decimal;
use serde::Deserialize;

const PROVIDER: &str = "quotes-file";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuotesDocument {
    prices: HashMap<AssetClass, HashMap<String, Decimal>>,
    rates: HashMap<RatePair, Decimal>,
}

pub struct QuotesFileFeed {
    path: PathBuf,
}

impl QuotesFileFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read(&self) -> Result<QuotesDocument, FetchError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            FetchError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Provider {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PriceFeedTrait for QuotesFileFeed {
    async fn fetch_price(
        &self,
        asset_class: AssetClass,
        symbol: &str,
    ) -> Result<Option<Decimal>, FetchError> {
        let doc = self.read().await?;
        Ok(doc
            .prices
            .get(&asset_class)
            .and_then(|prices| prices.get(symbol))
            .copied())
    }
}

#[async_trait]
impl RateFeedTrait for QuotesFileFeed {
    async fn fetch_rate(&self, pair: RatePair) -> Result<Option<Decimal>, FetchError> {
        let doc = self.read().await?;
        Ok(doc.rates.get(&pair).copied())
    }
}

/// Feed used when no quotes file is configured. Every lookup fails, so
/// refreshes report the feed as unavailable and keep known values.
pub struct UnconfiguredFeed;

#[async_trait]
impl PriceFeedTrait for UnconfiguredFeed {
    async fn fetch_price(&self, _: AssetClass, _: &str) -> Result<Option<Decimal>, FetchError> {
        Err(FetchError::Unavailable("no price feed configured".to_string()))
    }
}

#[async_trait]
impl RateFeedTrait for UnconfiguredFeed {
    async fn fetch_rate(&self, _: RatePair) -> Result<Option<Decimal>, FetchError> {
        Err(FetchError::Unavailable("no rate feed configured".to_string()))
    }
}
