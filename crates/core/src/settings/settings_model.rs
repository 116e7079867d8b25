//! Portfolio-wide settings: cross rates, idle cash and capital baselines.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_utils::{mul, sum};

/// Settings that every recomputation reads alongside the positions.
///
/// Rates convert one unit of the quoted currency into local currency.
/// Capital baselines are kept in their own currency and are only used for
/// the true-profit figure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSettings {
    /// Foreign currency -> local currency
    pub foreign_rate: Decimal,
    /// Stablecoin -> local currency
    pub stablecoin_rate: Decimal,
    pub local_cash: Decimal,
    pub foreign_cash: Decimal,
    /// Idle stablecoin balance on the crypto exchange
    pub crypto_cash: Decimal,
    pub local_capital: Decimal,
    pub foreign_capital: Decimal,
    pub crypto_capital: Decimal,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            foreign_rate: dec!(1),
            stablecoin_rate: dec!(1),
            local_cash: Decimal::ZERO,
            foreign_cash: Decimal::ZERO,
            crypto_cash: Decimal::ZERO,
            local_capital: Decimal::ZERO,
            foreign_capital: Decimal::ZERO,
            crypto_capital: Decimal::ZERO,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub foreign_rate: Option<Decimal>,
    pub stablecoin_rate: Option<Decimal>,
    pub local_cash: Option<Decimal>,
    pub foreign_cash: Option<Decimal>,
    pub crypto_cash: Option<Decimal>,
    pub local_capital: Option<Decimal>,
    pub foreign_capital: Option<Decimal>,
    pub crypto_capital: Option<Decimal>,
}

impl PortfolioSettings {
    /// Applies a partial update in place.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        let fields: [(&mut Decimal, Option<Decimal>); 8] = [
            (&mut self.foreign_rate, update.foreign_rate),
            (&mut self.stablecoin_rate, update.stablecoin_rate),
            (&mut self.local_cash, update.local_cash),
            (&mut self.foreign_cash, update.foreign_cash),
            (&mut self.crypto_cash, update.crypto_cash),
            (&mut self.local_capital, update.local_capital),
            (&mut self.foreign_capital, update.foreign_capital),
            (&mut self.crypto_capital, update.crypto_capital),
        ];
        for (target, value) in fields {
            if let Some(v) = value {
                *target = v;
            }
        }
    }

    /// Sum of the three capital baselines, converted to local currency.
    pub fn original_capital(&self) -> Decimal {
        sum([
            self.local_capital,
            mul(self.foreign_capital, self.foreign_rate),
            mul(self.crypto_capital, self.stablecoin_rate),
        ])
    }
}
