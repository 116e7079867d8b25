//! Pure risk aggregation over a position store.
//!
//! Every division is guarded: a non-positive (or overflowing) denominator
//! yields a defined fallback instead of a panic. Products and sums saturate.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::risk_model::{
    AlertKind, AlertSeverity, AnalysisResult, CryptoPositionMetrics, CryptoRisk, DebtSummary,
    EquityRisk, Leverage, MarginPositionRisk, RiskAlert,
};
use crate::constants::{
    DANGER_LIQUIDATION_DISTANCE, DANGER_MAINTENANCE_RATE, LIQUIDATION_THRESHOLD,
};
use crate::positions::{
    CryptoKind, CryptoPosition, DebtItem, ForeignEquityPosition, LocalEquityPosition,
    PositionSide, PositionState,
};
use crate::utils::decimal_utils::{add, div, mul, sub, sum};

const HUNDRED: Decimal = dec!(100);

/// `numerator / denominator`, or None when the denominator is not positive.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        div(numerator, denominator)
    } else {
        None
    }
}

/// `numerator / denominator * 100`, or zero when undefined.
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> Decimal {
    safe_div(numerator, denominator)
        .and_then(|r| r.checked_mul(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Market value over loan in percent. Defined only when a loan exists.
pub fn maintenance_rate(market_value: Decimal, loan: Decimal) -> Option<Decimal> {
    safe_div(market_value, loan).and_then(|r| r.checked_mul(HUNDRED))
}

/// Price at which the position's value falls to the liquidation threshold
/// of its loan.
pub fn margin_liquidation_price(loan: Decimal, shares: Decimal) -> Option<Decimal> {
    if shares.is_zero() {
        return None;
    }
    div(mul(loan, LIQUIDATION_THRESHOLD), shares)
}

/// Percentage gap between the current price and a long liquidation price.
pub fn distance_to_liquidation(price: Decimal, liquidation_price: Decimal) -> Option<Decimal> {
    safe_div(sub(price, liquidation_price), price).map(|r| mul(r, HUNDRED))
}

/// Flags a financed position as dangerous.
pub fn is_dangerous(maintenance: Decimal, distance: Option<Decimal>) -> bool {
    maintenance < DANGER_MAINTENANCE_RATE
        || distance.is_some_and(|d| d < DANGER_LIQUIDATION_DISTANCE)
}

fn margin_position_risk(
    position_id: &str,
    symbol: &str,
    price: Decimal,
    shares: Decimal,
    loan: Decimal,
) -> Option<MarginPositionRisk> {
    let market_value = mul(price, shares);
    let maintenance = maintenance_rate(market_value, loan)?;
    let liquidation_price = margin_liquidation_price(loan, shares);
    let distance_percent = liquidation_price.and_then(|liq| distance_to_liquidation(price, liq));

    Some(MarginPositionRisk {
        position_id: position_id.to_string(),
        symbol: symbol.to_string(),
        market_value,
        loan_amount: loan,
        maintenance_rate: maintenance,
        liquidation_price,
        distance_percent,
        is_dangerous: is_dangerous(maintenance, distance_percent),
    })
}

struct EquityLine<'a> {
    id: &'a str,
    symbol: &'a str,
    price: Decimal,
    shares: Decimal,
    cost_value: Decimal,
    loan: Decimal,
}

fn aggregate_equities<'a>(lines: impl Iterator<Item = EquityLine<'a>>, cash: Decimal) -> EquityRisk {
    let mut risk = EquityRisk {
        cash,
        ..EquityRisk::default()
    };

    for line in lines {
        risk.market_value = add(risk.market_value, mul(line.price, line.shares));
        risk.cost_value = add(risk.cost_value, line.cost_value);
        risk.loan = add(risk.loan, line.loan);
        if let Some(margin) =
            margin_position_risk(line.id, line.symbol, line.price, line.shares, line.loan)
        {
            risk.margin_positions.push(margin);
        }
    }

    risk.net_equity = sub(risk.market_value, risk.loan);
    risk.leverage = Leverage::from_exposure(risk.market_value, risk.net_equity);
    risk.utilization = percent_of(risk.market_value, add(risk.market_value, cash));
    risk.pnl = sub(risk.market_value, risk.cost_value);
    risk.pnl_percent = percent_of(risk.pnl, risk.cost_value);
    risk.maintenance_rate = maintenance_rate(risk.market_value, risk.loan);
    risk
}

/// Local equities against local idle cash.
pub fn analyze_local_equities(positions: &[LocalEquityPosition], cash: Decimal) -> EquityRisk {
    aggregate_equities(
        positions.iter().map(|p| EquityLine {
            id: &p.id,
            symbol: &p.symbol,
            price: p.current_price,
            shares: p.shares,
            cost_value: p.cost_value(),
            loan: p.loan_amount,
        }),
        cash,
    )
}

/// Foreign equities against foreign idle cash, in foreign currency.
pub fn analyze_foreign_equities(positions: &[ForeignEquityPosition], cash: Decimal) -> EquityRisk {
    aggregate_equities(
        positions.iter().map(|p| EquityLine {
            id: &p.id,
            symbol: &p.symbol,
            price: p.current_price,
            shares: p.shares,
            cost_value: p.cost_value(),
            loan: p.loan_amount,
        }),
        cash,
    )
}

/// Liquidation price for a crypto position: the explicit one when supplied,
/// otherwise an estimate from entry and leverage (only meaningful above 1x).
/// Returns the price and whether it was estimated.
pub fn crypto_liquidation_price(position: &CryptoPosition) -> Option<(Decimal, bool)> {
    match &position.kind {
        CryptoKind::Spot { .. } => None,
        CryptoKind::Future {
            liquidation_price: Some(explicit),
            ..
        } => Some((*explicit, false)),
        CryptoKind::Future { leverage, side, .. } => {
            if *leverage <= dec!(1) {
                return None;
            }
            let buffer = div(dec!(1), *leverage)?;
            let estimate = match side {
                PositionSide::Long => mul(position.entry_price, dec!(1) - buffer),
                PositionSide::Short => mul(position.entry_price, dec!(1) + buffer),
            };
            Some((estimate, true))
        }
    }
}

fn crypto_distance(position: &CryptoPosition, liquidation_price: Decimal) -> Option<Decimal> {
    let side = match &position.kind {
        CryptoKind::Future { side, .. } => *side,
        CryptoKind::Spot { .. } => PositionSide::Long,
    };
    match side {
        PositionSide::Long => distance_to_liquidation(position.current_price, liquidation_price),
        PositionSide::Short => safe_div(
            sub(liquidation_price, position.current_price),
            position.current_price,
        )
        .map(|r| mul(r, HUNDRED)),
    }
}

pub fn crypto_position_metrics(position: &CryptoPosition) -> CryptoPositionMetrics {
    let liquidation = crypto_liquidation_price(position);
    let distance_percent = liquidation.and_then(|(price, _)| crypto_distance(position, price));

    CryptoPositionMetrics {
        position_id: position.id.clone(),
        symbol: position.symbol.clone(),
        is_future: position.is_future(),
        capital: position.capital(),
        notional: position.notional(),
        pnl: position.pnl(),
        pnl_percent: position.pnl_percent(),
        liquidation_price: liquidation.map(|(price, _)| price),
        liquidation_estimated: liquidation.is_some_and(|(_, estimated)| estimated),
        distance_percent,
    }
}

/// Crypto positions plus the idle stablecoin balance, in stablecoin.
pub fn analyze_crypto(positions: &[CryptoPosition], idle_balance: Decimal) -> CryptoRisk {
    let metrics: Vec<CryptoPositionMetrics> =
        positions.iter().map(crypto_position_metrics).collect();

    let capital = sum(metrics.iter().map(|m| m.capital));
    let notional = sum(metrics.iter().map(|m| m.notional));
    let pnl = sum(metrics.iter().map(|m| m.pnl));
    let net_equity = sum([idle_balance, capital, pnl]);

    CryptoRisk {
        idle_balance,
        capital,
        notional,
        pnl,
        pnl_percent: percent_of(pnl, capital),
        net_equity,
        leverage: Leverage::from_exposure(notional, net_equity),
        utilization: percent_of(capital, add(capital, idle_balance)),
        positions: metrics,
    }
}

pub fn summarize_debts(debts: &[DebtItem]) -> DebtSummary {
    DebtSummary {
        count: debts.len(),
        total_balance: sum(debts.iter().map(|d| d.balance)),
        total_principal: sum(debts.iter().map(|d| d.principal)),
        monthly_payment: sum(debts.iter().map(|d| d.monthly_payment)),
    }
}

fn collect_alerts(
    local: &EquityRisk,
    foreign: &EquityRisk,
    crypto: &CryptoRisk,
    real_leverage: Leverage,
) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    for (class, risk) in [("local", local), ("foreign", foreign)] {
        for position in risk.dangerous_positions() {
            let below_call = position.maintenance_rate < LIQUIDATION_THRESHOLD * HUNDRED;
            alerts.push(RiskAlert {
                severity: if below_call {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                },
                kind: AlertKind::MaintenanceRate,
                subject: position.symbol.clone(),
                message: format!(
                    "{} {} maintenance rate {}%",
                    class,
                    position.symbol,
                    position.maintenance_rate.round_dp(1)
                ),
            });
        }
    }

    for position in &crypto.positions {
        if let Some(distance) = position.distance_percent {
            if distance < DANGER_LIQUIDATION_DISTANCE {
                alerts.push(RiskAlert {
                    severity: AlertSeverity::Critical,
                    kind: AlertKind::LiquidationDistance,
                    subject: position.symbol.clone(),
                    message: format!(
                        "{} is {}% from liquidation",
                        position.symbol,
                        distance.round_dp(1)
                    ),
                });
            }
        }
    }

    let class_leverage = [
        ("local equities", local.leverage),
        ("foreign equities", foreign.leverage),
        ("crypto", crypto.leverage),
        ("portfolio", real_leverage),
    ];
    for (subject, leverage) in class_leverage {
        if leverage.is_saturated() {
            alerts.push(RiskAlert {
                severity: AlertSeverity::Critical,
                kind: AlertKind::SaturatedLeverage,
                subject: subject.to_string(),
                message: format!("{} equity is exhausted", subject),
            });
        }
    }

    alerts
}

/// Full recomputation of the analysis for one state version.
pub fn analyze(state: &PositionState) -> AnalysisResult {
    let settings = &state.settings;
    let fx = settings.foreign_rate;
    let usdt = settings.stablecoin_rate;

    let local = analyze_local_equities(&state.local_equities, settings.local_cash);
    let foreign = analyze_foreign_equities(&state.foreign_equities, settings.foreign_cash);
    let crypto = analyze_crypto(&state.crypto_positions, settings.crypto_cash);
    let debts = summarize_debts(&state.debts);

    // Financing loans are already netted out of each class's equity.
    let gross_assets = sum([
        settings.local_cash,
        mul(settings.foreign_cash, fx),
        local.net_equity,
        mul(foreign.net_equity, fx),
        mul(crypto.net_equity, usdt),
    ]);
    let total_debt = debts.total_balance;
    let total_liabilities = sum([local.loan, mul(foreign.loan, fx), total_debt]);
    let net_worth = sub(gross_assets, total_debt);
    let total_exposure = sum([
        local.market_value,
        mul(foreign.market_value, fx),
        mul(crypto.notional, usdt),
    ]);
    let real_leverage = Leverage::from_exposure(total_exposure, net_worth);

    let total_pnl = sum([local.pnl, mul(foreign.pnl, fx), mul(crypto.pnl, usdt)]);
    let total_cost = sum([
        local.cost_value,
        mul(foreign.cost_value, fx),
        mul(crypto.capital, usdt),
    ]);
    let original_capital = settings.original_capital();
    let true_profit = sub(net_worth, original_capital);

    let alerts = collect_alerts(&local, &foreign, &crypto, real_leverage);
    debug!(
        "Analyzed state v{}: net worth {}, exposure {}, leverage {}, {} alerts",
        state.version,
        net_worth,
        total_exposure,
        real_leverage,
        alerts.len()
    );

    AnalysisResult {
        state_version: state.version,
        net_worth,
        gross_assets,
        total_debt,
        total_liabilities,
        total_exposure,
        real_leverage,
        local_equity: local,
        foreign_equity: foreign,
        crypto,
        debts,
        foreign_rate: fx,
        stablecoin_rate: usdt,
        total_pnl,
        total_pnl_percent: percent_of(total_pnl, total_cost),
        original_capital,
        true_profit,
        true_profit_percent: percent_of(true_profit, original_capital),
        alerts,
    }
}
