//! Risk aggregation models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::LEVERAGE_SENTINEL;
use crate::utils::decimal_utils::mul;

/// Exposure over net equity.
///
/// `Saturated` marks open exposure on zero or negative equity, where the
/// ratio is undefined. It is kept distinct from any finite ratio so that
/// comparisons downstream stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Leverage {
    Ratio(Decimal),
    Saturated,
}

impl Leverage {
    /// Positive equity gives a plain ratio. Non-positive equity with positive
    /// exposure saturates. Anything else (no position at all) is unlevered.
    pub fn from_exposure(exposure: Decimal, equity: Decimal) -> Self {
        if equity > Decimal::ZERO {
            match exposure.checked_div(equity) {
                Some(ratio) => Leverage::Ratio(ratio),
                None => Leverage::Saturated,
            }
        } else if exposure > Decimal::ZERO {
            Leverage::Saturated
        } else {
            Leverage::Ratio(dec!(1))
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, Leverage::Saturated)
    }

    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            Leverage::Ratio(r) => Some(*r),
            Leverage::Saturated => None,
        }
    }

    /// Numeric rendering for charts and sorting; saturation maps to the sentinel.
    pub fn as_decimal(&self) -> Decimal {
        self.ratio().unwrap_or(LEVERAGE_SENTINEL)
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Leverage::Ratio(dec!(1))
    }
}

impl std::fmt::Display for Leverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leverage::Ratio(r) => write!(f, "{}x", r.round_dp(2)),
            Leverage::Saturated => write!(f, "saturated"),
        }
    }
}

/// Liquidation metrics for a single financed local or foreign equity position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarginPositionRisk {
    pub position_id: String,
    pub symbol: String,
    pub market_value: Decimal,
    pub loan_amount: Decimal,
    pub maintenance_rate: Decimal,
    /// Absent when the position holds no shares
    pub liquidation_price: Option<Decimal>,
    /// Absent when price or liquidation price is undefined
    pub distance_percent: Option<Decimal>,
    pub is_dangerous: bool,
}

/// Aggregates for one equity class, in that class's currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquityRisk {
    pub market_value: Decimal,
    pub cost_value: Decimal,
    pub loan: Decimal,
    pub net_equity: Decimal,
    pub cash: Decimal,
    pub leverage: Leverage,
    pub utilization: Decimal,
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
    /// Market value over loan in percent; None means no margin debt
    pub maintenance_rate: Option<Decimal>,
    pub margin_positions: Vec<MarginPositionRisk>,
}

impl EquityRisk {
    pub fn dangerous_positions(&self) -> impl Iterator<Item = &MarginPositionRisk> {
        self.margin_positions.iter().filter(|p| p.is_dangerous)
    }
}

/// Derived figures for one crypto position, in stablecoin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoPositionMetrics {
    pub position_id: String,
    pub symbol: String,
    pub is_future: bool,
    /// Cost basis (spot) or margin (future)
    pub capital: Decimal,
    pub notional: Decimal,
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
    pub liquidation_price: Option<Decimal>,
    /// True when the liquidation price was estimated from entry and leverage
    pub liquidation_estimated: bool,
    pub distance_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoRisk {
    pub idle_balance: Decimal,
    pub capital: Decimal,
    pub notional: Decimal,
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
    pub net_equity: Decimal,
    pub leverage: Leverage,
    pub utilization: Decimal,
    pub positions: Vec<CryptoPositionMetrics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    pub count: usize,
    pub total_balance: Decimal,
    pub total_principal: Decimal,
    pub monthly_payment: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    MaintenanceRate,
    LiquidationDistance,
    SaturatedLeverage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub severity: AlertSeverity,
    pub kind: AlertKind,
    pub subject: String,
    pub message: String,
}

/// Everything derived from one version of the position store.
/// Blended figures are in local currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub state_version: u64,
    pub net_worth: Decimal,
    pub gross_assets: Decimal,
    pub total_debt: Decimal,
    pub total_liabilities: Decimal,
    pub total_exposure: Decimal,
    pub real_leverage: Leverage,
    pub local_equity: EquityRisk,
    /// Amounts in foreign currency
    pub foreign_equity: EquityRisk,
    /// Amounts in stablecoin
    pub crypto: CryptoRisk,
    pub debts: DebtSummary,
    pub foreign_rate: Decimal,
    pub stablecoin_rate: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_percent: Decimal,
    pub original_capital: Decimal,
    pub true_profit: Decimal,
    pub true_profit_percent: Decimal,
    pub alerts: Vec<RiskAlert>,
}

impl AnalysisResult {
    pub fn local_maintenance_rate(&self) -> Option<Decimal> {
        self.local_equity.maintenance_rate
    }

    pub fn foreign_market_value_local(&self) -> Decimal {
        mul(self.foreign_equity.market_value, self.foreign_rate)
    }

    pub fn crypto_notional_local(&self) -> Decimal {
        mul(self.crypto.notional, self.stablecoin_rate)
    }

    pub fn has_critical_alerts(&self) -> bool {
        self.alerts
            .iter()
            .any(|a| a.severity == AlertSeverity::Critical)
    }
}
