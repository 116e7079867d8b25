//! Position domain models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::MARGIN_LOAN_RATIO;
use crate::settings::PortfolioSettings;
use crate::utils::decimal_utils::{div, mul, sub};

/// Anything stored in the position lists, addressed by id.
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

/// A local-currency equity holding, financed by exchange margin or a pledge loan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalEquityPosition {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub cost_price: Decimal,
    pub current_price: Decimal,
    pub shares: Decimal,
    #[serde(default)]
    pub is_margin: bool,
    /// Pledge loan rate in percent (0-100); ignored for margin positions
    #[serde(default)]
    pub pledge_rate: Decimal,
    #[serde(default)]
    pub loan_amount: Decimal,
}

impl LocalEquityPosition {
    pub fn market_value(&self) -> Decimal {
        mul(self.current_price, self.shares)
    }

    pub fn cost_value(&self) -> Decimal {
        mul(self.cost_price, self.shares)
    }

    /// Margin purchases borrow a fixed share of cost; pledges borrow against
    /// current value.
    pub fn derived_loan(&self) -> Decimal {
        if self.is_margin {
            mul(self.cost_value(), MARGIN_LOAN_RATIO)
        } else {
            percent_share(self.market_value(), self.pledge_rate)
        }
    }

    pub fn sync_loan(&mut self) {
        self.loan_amount = self.derived_loan();
    }
}

/// A foreign-currency equity holding. All amounts are in foreign currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForeignEquityPosition {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    pub cost_price: Decimal,
    pub current_price: Decimal,
    pub shares: Decimal,
    #[serde(default)]
    pub is_margin: bool,
    /// Borrowed share of cost in percent (0-50)
    #[serde(default)]
    pub margin_ratio: Decimal,
    #[serde(default)]
    pub loan_amount: Decimal,
}

impl ForeignEquityPosition {
    pub fn market_value(&self) -> Decimal {
        mul(self.current_price, self.shares)
    }

    pub fn cost_value(&self) -> Decimal {
        mul(self.cost_price, self.shares)
    }

    /// The margin loan is opened against cost, so it stays put while the
    /// price moves.
    pub fn derived_loan(&self) -> Decimal {
        if self.is_margin {
            percent_share(self.cost_value(), self.margin_ratio)
        } else {
            Decimal::ZERO
        }
    }

    pub fn sync_loan(&mut self) {
        self.loan_amount = self.derived_loan();
    }
}

/// Direction of a futures position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    Long,
    Short,
}

/// Spot holdings carry units; futures carry margin and leverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CryptoKind {
    Spot {
        units: Decimal,
    },
    Future {
        margin: Decimal,
        leverage: Decimal,
        #[serde(default)]
        side: PositionSide,
        #[serde(
            default,
            rename = "liquidationPrice",
            skip_serializing_if = "Option::is_none"
        )]
        liquidation_price: Option<Decimal>,
    },
}

/// A crypto position quoted in stablecoin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoPosition {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    #[serde(flatten)]
    pub kind: CryptoKind,
}

impl CryptoPosition {
    /// Capital committed: cost basis for spot, margin for futures.
    pub fn capital(&self) -> Decimal {
        match &self.kind {
            CryptoKind::Spot { units } => mul(*units, self.entry_price),
            CryptoKind::Future { margin, .. } => *margin,
        }
    }

    pub fn notional(&self) -> Decimal {
        match &self.kind {
            CryptoKind::Spot { units } => mul(*units, self.current_price),
            CryptoKind::Future {
                margin, leverage, ..
            } => mul(*margin, *leverage),
        }
    }

    pub fn pnl_percent(&self) -> Decimal {
        match &self.kind {
            CryptoKind::Spot { .. } => {
                let cost = self.capital();
                if cost > Decimal::ZERO {
                    div(self.pnl(), cost).map_or(Decimal::ZERO, |r| mul(r, dec!(100)))
                } else {
                    Decimal::ZERO
                }
            }
            CryptoKind::Future { leverage, side, .. } => {
                if self.entry_price <= Decimal::ZERO {
                    return Decimal::ZERO;
                }
                let change = div(sub(self.current_price, self.entry_price), self.entry_price)
                    .unwrap_or(Decimal::ZERO);
                let move_pct = mul(mul(change, *leverage), dec!(100));
                match side {
                    PositionSide::Long => move_pct,
                    PositionSide::Short => -move_pct,
                }
            }
        }
    }

    pub fn pnl(&self) -> Decimal {
        match &self.kind {
            CryptoKind::Spot { units } => mul(sub(self.current_price, self.entry_price), *units),
            CryptoKind::Future { margin, .. } => percent_share(*margin, self.pnl_percent()),
        }
    }

    pub fn is_future(&self) -> bool {
        matches!(self.kind, CryptoKind::Future { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtCategory {
    Mortgage,
    Credit,
    Personal,
    Student,
    Car,
    #[default]
    Other,
}

/// A cash liability in local currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebtItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: DebtCategory,
    pub principal: Decimal,
    pub balance: Decimal,
    #[serde(default)]
    pub monthly_payment: Decimal,
    /// Annual interest rate in percent
    #[serde(default)]
    pub annual_rate: Decimal,
}

impl DebtItem {
    /// Months left at the current payment, ignoring interest.
    pub fn remaining_months(&self) -> Option<u32> {
        if self.monthly_payment <= Decimal::ZERO {
            return None;
        }
        let months = div(self.balance.max(Decimal::ZERO), self.monthly_payment)?.ceil();
        num_traits::ToPrimitive::to_u32(&months)
    }
}

impl_identified!(
    LocalEquityPosition,
    ForeignEquityPosition,
    CryptoPosition,
    DebtItem,
);

/// Which position list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PositionKind {
    LocalEquity,
    ForeignEquity,
    Crypto,
    Debt,
}

impl std::str::FromStr for PositionKind {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" | "localEquity" => Ok(PositionKind::LocalEquity),
            "foreign" | "foreignEquity" => Ok(PositionKind::ForeignEquity),
            "crypto" => Ok(PositionKind::Crypto),
            "debt" | "debts" => Ok(PositionKind::Debt),
            other => Err(crate::errors::ValidationError::InvalidInput(format!(
                "Unknown position kind '{}'",
                other
            ))
            .into()),
        }
    }
}

/// All holdings and settings. The single source every analysis reads.
///
/// `version` increases on every committed mutation so readers can tell
/// whether the state they analyzed is still current.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionState {
    pub version: u64,
    pub local_equities: Vec<LocalEquityPosition>,
    pub foreign_equities: Vec<ForeignEquityPosition>,
    pub crypto_positions: Vec<CryptoPosition>,
    pub debts: Vec<DebtItem>,
    pub settings: PortfolioSettings,
}

impl PositionState {
    /// Re-derives every loan amount from its inputs.
    pub fn sync_loans(&mut self) {
        self.local_equities
            .iter_mut()
            .for_each(LocalEquityPosition::sync_loan);
        self.foreign_equities
            .iter_mut()
            .for_each(ForeignEquityPosition::sync_loan);
    }

    pub fn is_empty(&self) -> bool {
        self.local_equities.is_empty()
            && self.foreign_equities.is_empty()
            && self.crypto_positions.is_empty()
            && self.debts.is_empty()
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    pub fn upsert_local_equity(&mut self, mut position: LocalEquityPosition) -> LocalEquityPosition {
        position.sync_loan();
        upsert(&mut self.local_equities, position.clone());
        self.bump();
        position
    }

    pub fn upsert_foreign_equity(
        &mut self,
        mut position: ForeignEquityPosition,
    ) -> ForeignEquityPosition {
        position.sync_loan();
        upsert(&mut self.foreign_equities, position.clone());
        self.bump();
        position
    }

    pub fn upsert_crypto(&mut self, position: CryptoPosition) -> CryptoPosition {
        upsert(&mut self.crypto_positions, position.clone());
        self.bump();
        position
    }

    pub fn upsert_debt(&mut self, debt: DebtItem) -> DebtItem {
        upsert(&mut self.debts, debt.clone());
        self.bump();
        debt
    }

    /// Removes an entry by id. Returns false when nothing matched.
    pub fn remove(&mut self, kind: PositionKind, id: &str) -> bool {
        let removed = match kind {
            PositionKind::LocalEquity => remove_by_id(&mut self.local_equities, id),
            PositionKind::ForeignEquity => remove_by_id(&mut self.foreign_equities, id),
            PositionKind::Crypto => remove_by_id(&mut self.crypto_positions, id),
            PositionKind::Debt => remove_by_id(&mut self.debts, id),
        };
        if removed {
            self.bump();
        }
        removed
    }

    pub fn update_settings(&mut self, update: &crate::settings::SettingsUpdate) {
        self.settings.apply(update);
        self.sync_loans();
        self.bump();
    }

    /// Replaces the whole state while keeping the version monotonic.
    pub fn replace_with(&mut self, mut other: PositionState) {
        other.version = self.version.max(other.version) + 1;
        other.sync_loans();
        *self = other;
    }
}

/// `percent` percent of `amount`.
fn percent_share(amount: Decimal, percent: Decimal) -> Decimal {
    div(mul(amount, percent), dec!(100)).unwrap_or(Decimal::ZERO)
}

fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
