use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::market_data_errors::FetchError;
use super::market_data_model::{AssetClass, PriceRefreshReport, RatePair, RefreshFailure};
use super::market_data_traits::{MarketDataServiceTrait, PriceFeedTrait, RateFeedTrait};
use crate::errors::Result;
use crate::positions::{PositionServiceTrait, PositionState};
use crate::settings::SettingsUpdate;

type PriceKey = (AssetClass, String);

pub struct MarketDataService {
    positions: Arc<dyn PositionServiceTrait>,
    price_feed: Arc<dyn PriceFeedTrait>,
    rate_feed: Arc<dyn RateFeedTrait>,
}

impl MarketDataService {
    pub fn new(
        positions: Arc<dyn PositionServiceTrait>,
        price_feed: Arc<dyn PriceFeedTrait>,
        rate_feed: Arc<dyn RateFeedTrait>,
    ) -> Self {
        Self {
            positions,
            price_feed,
            rate_feed,
        }
    }

    /// Distinct symbols held, per asset class.
    fn held_symbols(state: &PositionState) -> BTreeSet<PriceKey> {
        let local = state
            .local_equities
            .iter()
            .map(|p| (AssetClass::LocalEquity, p.symbol.clone()));
        let foreign = state
            .foreign_equities
            .iter()
            .map(|p| (AssetClass::ForeignEquity, p.symbol.clone()));
        let crypto = state
            .crypto_positions
            .iter()
            .map(|p| (AssetClass::Crypto, p.symbol.clone()));
        local
            .chain(foreign)
            .chain(crypto)
            .filter(|(_, symbol)| !symbol.trim().is_empty())
            .collect()
    }

    /// Sorts one lookup result into the report. Returns the value to apply.
    fn classify(
        label: String,
        outcome: std::result::Result<Option<Decimal>, FetchError>,
        report: &mut PriceRefreshReport,
    ) -> Option<Decimal> {
        match outcome {
            Ok(Some(value)) if value > Decimal::ZERO => {
                report.updated.push(label);
                Some(value)
            }
            Ok(Some(value)) => {
                report.failed.push(RefreshFailure {
                    symbol: label,
                    reason: FetchError::InvalidResponse(value.to_string()).to_string(),
                });
                None
            }
            Ok(None) => {
                report.unchanged.push(label);
                None
            }
            Err(e) => {
                warn!("Lookup for {} failed: {}", label, e);
                report.failed.push(RefreshFailure {
                    symbol: label,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn apply_prices(state: &mut PositionState, prices: &HashMap<PriceKey, Decimal>) {
        for p in state.local_equities.iter_mut() {
            if let Some(price) = prices.get(&(AssetClass::LocalEquity, p.symbol.clone())) {
                p.current_price = *price;
            }
        }
        for p in state.foreign_equities.iter_mut() {
            if let Some(price) = prices.get(&(AssetClass::ForeignEquity, p.symbol.clone())) {
                p.current_price = *price;
            }
        }
        for p in state.crypto_positions.iter_mut() {
            if let Some(price) = prices.get(&(AssetClass::Crypto, p.symbol.clone())) {
                p.current_price = *price;
            }
        }
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn refresh_prices(&self) -> Result<PriceRefreshReport> {
        let state = self.positions.get_state();
        let targets: Vec<PriceKey> = Self::held_symbols(&state).into_iter().collect();

        let lookups = targets
            .iter()
            .map(|(class, symbol)| self.price_feed.fetch_price(*class, symbol));
        let outcomes = join_all(lookups).await;

        let mut report = PriceRefreshReport::default();
        let mut prices = HashMap::new();
        for (key, outcome) in targets.into_iter().zip(outcomes) {
            if let Some(price) = Self::classify(key.1.clone(), outcome, &mut report) {
                prices.insert(key, price);
            }
        }

        report.state_version = if prices.is_empty() {
            state.version
        } else {
            self.positions
                .mutate(Box::new(move |s: &mut PositionState| {
                    Self::apply_prices(s, &prices)
                }))
                .await?
                .version
        };
        debug!(
            "Price refresh: {} updated, {} unchanged, {} failed",
            report.updated.len(),
            report.unchanged.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn refresh_rates(&self) -> Result<PriceRefreshReport> {
        let (foreign, stablecoin) = futures::join!(
            self.rate_feed.fetch_rate(RatePair::ForeignToLocal),
            self.rate_feed.fetch_rate(RatePair::StablecoinToLocal)
        );

        let mut report = PriceRefreshReport::default();
        let update = SettingsUpdate {
            foreign_rate: Self::classify(RatePair::ForeignToLocal.to_string(), foreign, &mut report),
            stablecoin_rate: Self::classify(
                RatePair::StablecoinToLocal.to_string(),
                stablecoin,
                &mut report,
            ),
            ..SettingsUpdate::default()
        };

        report.state_version = if update.foreign_rate.is_none() && update.stablecoin_rate.is_none() {
            self.positions.get_state().version
        } else {
            self.positions.update_settings(update).await?.version
        };
        Ok(report)
    }
}
