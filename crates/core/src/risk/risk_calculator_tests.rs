//! Unit tests for the risk calculator.

use super::*;
use crate::positions::{
    CryptoKind, CryptoPosition, DebtCategory, DebtItem, ForeignEquityPosition,
    LocalEquityPosition, PositionSide, PositionState,
};
use crate::settings::PortfolioSettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Fixtures
// ============================================================================

fn local_margin(id: &str, cost: Decimal, price: Decimal, shares: Decimal) -> LocalEquityPosition {
    let mut p = LocalEquityPosition {
        id: id.to_string(),
        symbol: id.to_string(),
        name: String::new(),
        cost_price: cost,
        current_price: price,
        shares,
        is_margin: true,
        pledge_rate: Decimal::ZERO,
        loan_amount: Decimal::ZERO,
    };
    p.sync_loan();
    p
}

fn local_cash_position(id: &str, cost: Decimal, price: Decimal, shares: Decimal) -> LocalEquityPosition {
    let mut p = local_margin(id, cost, price, shares);
    p.is_margin = false;
    p.sync_loan();
    p
}

fn future(
    margin: Decimal,
    leverage: Decimal,
    entry: Decimal,
    current: Decimal,
    side: PositionSide,
) -> CryptoPosition {
    CryptoPosition {
        id: "fut".to_string(),
        symbol: "BTCUSDT".to_string(),
        entry_price: entry,
        current_price: current,
        kind: CryptoKind::Future {
            margin,
            leverage,
            side,
            liquidation_price: None,
        },
    }
}

fn spot(units: Decimal, entry: Decimal, current: Decimal) -> CryptoPosition {
    CryptoPosition {
        id: "spot".to_string(),
        symbol: "ETH".to_string(),
        entry_price: entry,
        current_price: current,
        kind: CryptoKind::Spot { units },
    }
}

// ============================================================================
// Leverage
// ============================================================================

#[test]
fn test_leverage_ratio_for_positive_equity() {
    assert_eq!(
        Leverage::from_exposure(dec!(600000), dec!(300000)),
        Leverage::Ratio(dec!(2))
    );
}

#[test]
fn test_leverage_saturates_on_non_positive_equity() {
    assert_eq!(
        Leverage::from_exposure(dec!(100), Decimal::ZERO),
        Leverage::Saturated
    );
    assert_eq!(
        Leverage::from_exposure(dec!(100), dec!(-50)),
        Leverage::Saturated
    );
    assert_eq!(Leverage::Saturated.as_decimal(), dec!(999));
}

#[test]
fn test_leverage_is_one_without_positions() {
    assert_eq!(
        Leverage::from_exposure(Decimal::ZERO, Decimal::ZERO),
        Leverage::Ratio(dec!(1))
    );
}

#[test]
fn test_leverage_serialization_is_tagged() {
    let json = serde_json::to_value(Leverage::Saturated).unwrap();
    assert_eq!(json["kind"], "saturated");
    let ratio = serde_json::to_value(Leverage::Ratio(dec!(2))).unwrap();
    assert_eq!(ratio["kind"], "ratio");
}

// ============================================================================
// Local equities
// ============================================================================

#[test]
fn test_local_margin_position_example() {
    let position = local_margin("2330", dec!(500), dec!(600), dec!(1000));
    assert_eq!(position.loan_amount, dec!(300000));

    let risk = analyze_local_equities(&[position], Decimal::ZERO);
    assert_eq!(risk.market_value, dec!(600000));
    assert_eq!(risk.net_equity, dec!(300000));
    assert_eq!(risk.leverage, Leverage::Ratio(dec!(2)));
    assert_eq!(risk.maintenance_rate, Some(dec!(200)));

    let margin = &risk.margin_positions[0];
    assert_eq!(margin.liquidation_price, Some(dec!(390)));
    assert_eq!(margin.distance_percent, Some(dec!(35)));
    assert!(!margin.is_dangerous);
}

#[test]
fn test_maintenance_rate_is_none_without_loan() {
    let position = local_cash_position("0050", dec!(100), dec!(120), dec!(1000));
    assert_eq!(position.loan_amount, Decimal::ZERO);

    let risk = analyze_local_equities(&[position], dec!(30000));
    assert_eq!(risk.maintenance_rate, None);
    assert!(risk.margin_positions.is_empty());
    assert_eq!(risk.leverage, Leverage::Ratio(dec!(1)));
    // 120000 / (120000 + 30000)
    assert_eq!(risk.utilization, dec!(80));
    assert_eq!(risk.pnl, dec!(20000));
    assert_eq!(risk.pnl_percent, dec!(20));
}

#[test]
fn test_pledge_loan_follows_current_price() {
    let mut position = local_cash_position("2317", dec!(100), dec!(150), dec!(2000));
    position.pledge_rate = dec!(50);
    position.sync_loan();
    assert_eq!(position.loan_amount, dec!(150000));

    let risk = analyze_local_equities(&[position], Decimal::ZERO);
    assert_eq!(risk.maintenance_rate, Some(dec!(200)));
}

#[test]
fn test_margin_position_flagged_below_maintenance_threshold() {
    // loan 300000; price 410 -> mv 410000 -> 136.67%
    let position = local_margin("2330", dec!(500), dec!(410), dec!(1000));
    let risk = analyze_local_equities(&[position], Decimal::ZERO);
    let margin = &risk.margin_positions[0];
    assert!(margin.maintenance_rate < dec!(140));
    assert!(margin.is_dangerous);
}

#[test]
fn test_danger_flag_is_monotonic_in_price() {
    let mut previous_distance: Option<Decimal> = None;
    let mut seen_safe = false;
    for price in (380..=900).step_by(10) {
        let position = local_margin("2330", dec!(500), Decimal::from(price), dec!(1000));
        let risk = analyze_local_equities(&[position], Decimal::ZERO);
        let margin = &risk.margin_positions[0];

        if let (Some(prev), Some(current)) = (previous_distance, margin.distance_percent) {
            assert!(current > prev, "distance must grow with price");
        }
        previous_distance = margin.distance_percent;

        if !margin.is_dangerous {
            seen_safe = true;
        } else {
            assert!(!seen_safe, "a higher price must not become dangerous again");
        }
    }
    assert!(seen_safe);
}

#[test]
fn test_negative_equity_saturates_class_leverage() {
    let mut position = local_margin("2330", dec!(500), dec!(100), dec!(1000));
    position.loan_amount = dec!(300000);
    let risk = analyze_local_equities(&[position], Decimal::ZERO);
    assert!(risk.net_equity < Decimal::ZERO);
    assert_eq!(risk.leverage, Leverage::Saturated);
}

#[test]
fn test_zero_shares_margin_position_has_no_liquidation_price() {
    let mut position = local_margin("2330", dec!(500), dec!(600), Decimal::ZERO);
    position.loan_amount = dec!(1000);
    let risk = analyze_local_equities(&[position], Decimal::ZERO);
    let margin = &risk.margin_positions[0];
    assert_eq!(margin.liquidation_price, None);
    assert_eq!(margin.distance_percent, None);
    assert_eq!(margin.maintenance_rate, Decimal::ZERO);
    assert!(margin.is_dangerous);
}

// ============================================================================
// Foreign equities
// ============================================================================

fn foreign_margin(id: &str, cost: Decimal, price: Decimal, shares: Decimal, ratio: Decimal) -> ForeignEquityPosition {
    let mut p = ForeignEquityPosition {
        id: id.to_string(),
        symbol: id.to_uppercase(),
        cost_price: cost,
        current_price: price,
        shares,
        is_margin: true,
        margin_ratio: ratio,
        loan_amount: Decimal::ZERO,
    };
    p.sync_loan();
    p
}

#[test]
fn test_foreign_margin_loan_uses_margin_ratio_of_cost() {
    let position = foreign_margin("nvda", dec!(100), dec!(120), dec!(10.5), dec!(50));
    assert_eq!(position.loan_amount, dec!(525));

    let risk = analyze_foreign_equities(&[position], dec!(740));
    assert_eq!(risk.market_value, dec!(1260));
    assert_eq!(risk.net_equity, dec!(735));
    assert_eq!(risk.leverage, Leverage::Ratio(dec!(1260) / dec!(735)));
    assert_eq!(risk.maintenance_rate, Some(dec!(240)));
    // 1260 / 2000
    assert_eq!(risk.utilization, dec!(63));
}

#[test]
fn test_foreign_margin_loan_ignores_price_moves() {
    let mut position = foreign_margin("nvda", dec!(200), dec!(200), dec!(10), dec!(50));
    assert_eq!(position.loan_amount, dec!(1000));
    let before = analyze_foreign_equities(&[position.clone()], Decimal::ZERO);

    position.current_price = dec!(100);
    position.sync_loan();
    assert_eq!(position.loan_amount, dec!(1000));
    let after = analyze_foreign_equities(&[position], Decimal::ZERO);

    assert_eq!(before.maintenance_rate, Some(dec!(200)));
    assert_eq!(after.maintenance_rate, Some(dec!(100)));
    assert!(!before.margin_positions[0].is_dangerous);
    assert!(after.margin_positions[0].is_dangerous);
}

#[test]
fn test_foreign_danger_flag_is_monotonic_in_price() {
    let mut previous_distance: Option<Decimal> = None;
    for price in (100..=400).step_by(20) {
        let position = foreign_margin("nvda", dec!(200), Decimal::from(price), dec!(10), dec!(50));
        let risk = analyze_foreign_equities(&[position], Decimal::ZERO);
        let distance = risk.margin_positions[0].distance_percent;
        if let (Some(prev), Some(current)) = (previous_distance, distance) {
            assert!(current > prev, "distance must grow with price");
        }
        previous_distance = distance;
    }
}

#[test]
fn test_foreign_loan_cleared_when_margin_disabled() {
    let mut position = ForeignEquityPosition {
        id: "aapl".to_string(),
        symbol: "AAPL".to_string(),
        cost_price: dec!(150),
        current_price: dec!(180),
        shares: dec!(3),
        is_margin: false,
        margin_ratio: dec!(40),
        loan_amount: dec!(99),
    };
    position.sync_loan();
    assert_eq!(position.loan_amount, Decimal::ZERO);
}

// ============================================================================
// Crypto
// ============================================================================

#[test]
fn test_crypto_future_example() {
    let position = future(dec!(1000), dec!(5), dec!(100), dec!(110), PositionSide::Long);
    let metrics = crypto_position_metrics(&position);

    assert_eq!(metrics.pnl_percent, dec!(50));
    assert_eq!(metrics.pnl, dec!(500));
    assert_eq!(metrics.notional, dec!(5000));
    assert_eq!(metrics.liquidation_price, Some(dec!(80)));
    assert!(metrics.liquidation_estimated);
    assert_eq!(metrics.distance_percent.unwrap().round_dp(1), dec!(27.3));
}

#[test]
fn test_crypto_short_future_inverts_pnl_and_liquidation() {
    let position = future(dec!(1000), dec!(5), dec!(100), dec!(90), PositionSide::Short);
    let metrics = crypto_position_metrics(&position);

    assert_eq!(metrics.pnl_percent, dec!(50));
    assert_eq!(metrics.pnl, dec!(500));
    assert_eq!(metrics.liquidation_price, Some(dec!(120)));
    // (120 - 90) / 90
    assert_eq!(metrics.distance_percent.unwrap().round_dp(2), dec!(33.33));
}

#[test]
fn test_crypto_explicit_liquidation_price_wins() {
    let mut position = future(dec!(1000), dec!(5), dec!(100), dec!(110), PositionSide::Long);
    if let CryptoKind::Future {
        liquidation_price, ..
    } = &mut position.kind
    {
        *liquidation_price = Some(dec!(88));
    }
    let metrics = crypto_position_metrics(&position);
    assert_eq!(metrics.liquidation_price, Some(dec!(88)));
    assert!(!metrics.liquidation_estimated);
    assert_eq!(metrics.distance_percent.unwrap(), dec!(20));
}

#[test]
fn test_crypto_unlevered_future_has_no_estimate() {
    let position = future(dec!(1000), dec!(1), dec!(100), dec!(110), PositionSide::Long);
    let metrics = crypto_position_metrics(&position);
    assert_eq!(metrics.liquidation_price, None);
    assert_eq!(metrics.distance_percent, None);
}

#[test]
fn test_crypto_spot_metrics() {
    let position = spot(dec!(2), dec!(1500), dec!(1800));
    let metrics = crypto_position_metrics(&position);
    assert_eq!(metrics.capital, dec!(3000));
    assert_eq!(metrics.notional, dec!(3600));
    assert_eq!(metrics.pnl, dec!(600));
    assert_eq!(metrics.pnl_percent, dec!(20));
    assert_eq!(metrics.liquidation_price, None);
}

#[test]
fn test_crypto_blended_equity_and_leverage() {
    let positions = vec![
        spot(dec!(1), dec!(1000), dec!(1000)),
        future(dec!(1000), dec!(5), dec!(100), dec!(110), PositionSide::Long),
    ];
    let risk = analyze_crypto(&positions, dec!(2000));

    // idle 2000 + capital 2000 + pnl 500
    assert_eq!(risk.net_equity, dec!(4500));
    assert_eq!(risk.notional, dec!(6000));
    assert_eq!(
        risk.leverage,
        Leverage::Ratio(dec!(6000) / dec!(4500))
    );
    assert_eq!(risk.utilization, dec!(50));
}

#[test]
fn test_crypto_wiped_out_future_saturates() {
    let positions = vec![future(
        dec!(1000),
        dec!(10),
        dec!(100),
        dec!(85),
        PositionSide::Long,
    )];
    let risk = analyze_crypto(&positions, Decimal::ZERO);
    // pnl -150% of margin
    assert!(risk.net_equity < Decimal::ZERO);
    assert_eq!(risk.leverage, Leverage::Saturated);
}

// ============================================================================
// Blended totals
// ============================================================================

fn blended_state() -> PositionState {
    PositionState {
        version: 7,
        local_equities: vec![local_margin("2330", dec!(500), dec!(600), dec!(1000))],
        foreign_equities: vec![foreign_margin("nvda", dec!(100), dec!(120), dec!(10), dec!(50))],
        crypto_positions: vec![spot(dec!(1), dec!(100), dec!(120))],
        debts: vec![DebtItem {
            id: "mortgage".to_string(),
            name: "Home".to_string(),
            category: DebtCategory::Mortgage,
            principal: dec!(80000),
            balance: dec!(50000),
            monthly_payment: dec!(2000),
            annual_rate: dec!(2.1),
        }],
        settings: PortfolioSettings {
            foreign_rate: dec!(30),
            stablecoin_rate: dec!(32),
            local_cash: dec!(100000),
            foreign_cash: dec!(1000),
            crypto_cash: dec!(500),
            local_capital: dec!(300000),
            foreign_capital: dec!(1000),
            crypto_capital: dec!(500),
        },
    }
}

#[test]
fn test_blended_totals() {
    let result = analyze(&blended_state());

    assert_eq!(result.state_version, 7);
    // foreign: mv 1200, loan 500 (cost 1000 at 50%), net equity 700
    assert_eq!(result.foreign_equity.loan, dec!(500));
    assert_eq!(result.foreign_equity.net_equity, dec!(700));
    // 100000 + 1000 * 30 + 300000 + 700 * 30 + 620 * 32
    assert_eq!(result.gross_assets, dec!(470840));
    assert_eq!(result.total_debt, dec!(50000));
    assert_eq!(result.net_worth, dec!(420840));
    // 300000 + 500 * 30 + 50000
    assert_eq!(result.total_liabilities, dec!(365000));
    // 600000 + 1200 * 30 + 120 * 32
    assert_eq!(result.total_exposure, dec!(639840));
    assert_eq!(
        result.real_leverage,
        Leverage::Ratio(dec!(639840) / dec!(420840))
    );
    assert_eq!(result.local_maintenance_rate(), Some(dec!(200)));
    assert_eq!(result.foreign_equity.maintenance_rate, Some(dec!(240)));
    // 100000 local + 200 * 30 foreign + 20 * 32 crypto
    assert_eq!(result.total_pnl, dec!(106640));
    // 300000 + 30000 + 16000
    assert_eq!(result.original_capital, dec!(346000));
    assert_eq!(result.true_profit, dec!(74840));
}

#[test]
fn test_analysis_is_deterministic() {
    let state = blended_state();
    assert_eq!(analyze(&state), analyze(&state));
}

#[test]
fn test_empty_state_is_unlevered_and_finite() {
    let result = analyze(&PositionState::default());
    assert_eq!(result.net_worth, Decimal::ZERO);
    assert_eq!(result.real_leverage, Leverage::Ratio(dec!(1)));
    assert_eq!(result.local_equity.utilization, Decimal::ZERO);
    assert_eq!(result.total_pnl_percent, Decimal::ZERO);
    assert_eq!(result.true_profit_percent, Decimal::ZERO);
    assert!(result.alerts.is_empty());
}

#[test]
fn test_debt_exceeding_assets_saturates_real_leverage() {
    let mut state = blended_state();
    state.debts[0].balance = dec!(1000000);
    let result = analyze(&state);
    assert!(result.net_worth < Decimal::ZERO);
    assert_eq!(result.real_leverage, Leverage::Saturated);
    assert!(result.has_critical_alerts());
    assert!(result
        .alerts
        .iter()
        .any(|a| a.kind == AlertKind::SaturatedLeverage && a.subject == "portfolio"));
}

#[test]
fn test_alerts_for_dangerous_positions() {
    let mut state = blended_state();
    state.local_equities = vec![local_margin("2330", dec!(500), dec!(380), dec!(1000))];
    state.crypto_positions = vec![future(
        dec!(1000),
        dec!(10),
        dec!(100),
        dec!(95),
        PositionSide::Long,
    )];
    let result = analyze(&state);

    let maintenance = result
        .alerts
        .iter()
        .find(|a| a.kind == AlertKind::MaintenanceRate)
        .expect("maintenance alert");
    // 380000 / 300000 = 126.7% is below the 130% call line
    assert_eq!(maintenance.severity, AlertSeverity::Critical);

    // liquidation estimate 90, distance 5.26%
    assert!(result
        .alerts
        .iter()
        .any(|a| a.kind == AlertKind::LiquidationDistance && a.subject == "BTCUSDT"));
}

#[test]
fn test_guards_never_panic_on_degenerate_inputs() {
    assert_eq!(safe_div(dec!(1), Decimal::ZERO), None);
    assert_eq!(safe_div(dec!(1), dec!(-1)), None);
    assert_eq!(percent_of(dec!(5), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(maintenance_rate(dec!(100), Decimal::ZERO), None);
    assert_eq!(distance_to_liquidation(Decimal::ZERO, dec!(10)), None);
}

#[test]
fn test_oversized_inputs_saturate_instead_of_panicking() {
    let huge = Decimal::from(1_000_000_000_000_000_i64);
    let mut state = PositionState::default();
    state.local_equities = vec![local_cash_position("big", huge, huge, huge)];
    state.foreign_equities = vec![foreign_margin("big", huge, huge, huge, dec!(50))];
    state.crypto_positions = vec![future(huge, huge, huge, huge, PositionSide::Long)];
    state.settings.foreign_rate = huge;
    state.settings.stablecoin_rate = huge;

    let result = analyze(&state);
    assert_eq!(result.local_equity.market_value, Decimal::MAX);
    assert_eq!(result.total_exposure, Decimal::MAX);
}
