use async_trait::async_trait;
use rust_decimal::Decimal;

use super::market_data_errors::FetchError;
use super::market_data_model::{AssetClass, PriceRefreshReport, RatePair};
use crate::errors::Result;

/// A source of current prices. `Ok(None)` means the feed has no price for
/// the symbol right now.
#[async_trait]
pub trait PriceFeedTrait: Send + Sync {
    async fn fetch_price(
        &self,
        asset_class: AssetClass,
        symbol: &str,
    ) -> std::result::Result<Option<Decimal>, FetchError>;
}

#[async_trait]
pub trait RateFeedTrait: Send + Sync {
    async fn fetch_rate(&self, pair: RatePair) -> std::result::Result<Option<Decimal>, FetchError>;
}

#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Fetches a price for every held symbol and applies the usable ones.
    async fn refresh_prices(&self) -> Result<PriceRefreshReport>;

    /// Fetches both cross rates and applies the usable ones.
    async fn refresh_rates(&self) -> Result<PriceRefreshReport>;
}
