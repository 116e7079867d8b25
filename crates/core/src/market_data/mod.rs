//! Market data - price and rate feeds and the refresh that applies them.

mod market_data_errors;
mod market_data_model;
mod market_data_service;
mod market_data_traits;

pub use market_data_errors::FetchError;
pub use market_data_model::{AssetClass, PriceRefreshReport, RatePair, RefreshFailure};
pub use market_data_service::MarketDataService;
pub use market_data_traits::{MarketDataServiceTrait, PriceFeedTrait, RateFeedTrait};
