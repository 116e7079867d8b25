//! Property-based tests for snapshot retention, trends, goals and export.

use chrono::{NaiveDate, NaiveTime, Utc};
use marginwatch_core::exchange::{export_bundle, parse_bundle};
use marginwatch_core::goals::{goal_progress, Goal};
use marginwatch_core::positions::{DebtCategory, DebtItem, PositionState};
use marginwatch_core::risk::Leverage;
use marginwatch_core::snapshots::{apply_retention, Snapshot, SnapshotKey};
use marginwatch_core::trends::wave_analysis;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

// =============================================================================
// Generators
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn snapshot(key: SnapshotKey, net_worth: Decimal) -> Snapshot {
    let time = key.time.unwrap_or(NaiveTime::MIN);
    Snapshot {
        key,
        timestamp: key.date.and_time(time).and_utc().timestamp(),
        net_worth,
        gross_assets: net_worth,
        total_debt: Decimal::ZERO,
        local_market_value: Decimal::ZERO,
        foreign_market_value: Decimal::ZERO,
        crypto_market_value: Decimal::ZERO,
        local_cash: Decimal::ZERO,
        foreign_cash: Decimal::ZERO,
        crypto_cash: Decimal::ZERO,
        total_pnl: Decimal::ZERO,
        total_pnl_percent: Decimal::ZERO,
        leverage: Leverage::default(),
        local_utilization: Decimal::ZERO,
        foreign_utilization: Decimal::ZERO,
        crypto_utilization: Decimal::ZERO,
    }
}

/// A capture: day offset from the base date and second of day.
fn arb_capture() -> impl Strategy<Value = (u64, u32)> {
    (0u64..6, 0u32..86_400)
}

fn arb_net_worth() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any sequence of in-order captures, past dates hold one compacted
    /// entry, today holds at most five, and keys ascend.
    #[test]
    fn prop_retention_invariants(mut captures in proptest::collection::vec(arb_capture(), 1..40)) {
        captures.sort();
        let mut series = Vec::new();
        let mut today = base_date();
        for (offset, second) in captures {
            today = base_date() + chrono::Days::new(offset);
            let time = NaiveTime::from_num_seconds_from_midnight_opt(second, 0).unwrap();
            series = apply_retention(series, snapshot(SnapshotKey::intraday(today, time), Decimal::ONE), today);
        }

        let mut per_date: HashMap<NaiveDate, usize> = HashMap::new();
        for s in &series {
            *per_date.entry(s.key.date).or_default() += 1;
            if s.key.date != today {
                prop_assert!(s.key.is_compacted());
            }
        }
        for (date, count) in per_date {
            if date == today {
                prop_assert!(count <= 5);
            } else {
                prop_assert_eq!(count, 1);
            }
        }
        prop_assert!(series.windows(2).all(|w| w[0].key < w[1].key));
    }

    /// Current position always lies within [0, 100].
    #[test]
    fn prop_wave_position_bounded(values in proptest::collection::vec(arb_net_worth(), 1..30)) {
        let series: Vec<Snapshot> = values
            .iter()
            .enumerate()
            .map(|(i, v)| snapshot(SnapshotKey::compacted(base_date() + chrono::Days::new(i as u64)), *v))
            .collect();
        let wave = wave_analysis(&series).unwrap();
        prop_assert!(wave.current_position >= Decimal::ZERO);
        prop_assert!(wave.current_position <= Decimal::ONE_HUNDRED);
        if wave.high == wave.low {
            prop_assert_eq!(wave.current_position, Decimal::from(50));
        }
    }

    /// Progress is bounded and reaches 100 exactly when the goal is met.
    #[test]
    fn prop_goal_progress_bounded(target in 1i64..100_000_000, current in arb_net_worth()) {
        let goal = Goal {
            id: "g".to_string(),
            name: "g".to_string(),
            target_amount: Decimal::from(target),
            deadline: None,
            created_at: Utc::now(),
            achieved_at: None,
        };
        let progress = goal_progress(&goal, current);
        prop_assert!(progress.progress >= Decimal::ZERO);
        prop_assert!(progress.progress <= Decimal::ONE_HUNDRED);
        prop_assert_eq!(progress.achieved, progress.progress == Decimal::ONE_HUNDRED);
    }

    /// Export then import reproduces the position store.
    #[test]
    fn prop_export_import_round_trip(
        balances in proptest::collection::vec((1i64..100_000_000, 0i64..1_000_000), 0..6),
        cash in arb_net_worth(),
    ) {
        let mut state = PositionState::default();
        for (i, (balance, payment)) in balances.into_iter().enumerate() {
            state.upsert_debt(DebtItem {
                id: format!("d{}", i),
                name: format!("Debt {}", i),
                category: DebtCategory::Personal,
                principal: Decimal::new(balance, 2),
                balance: Decimal::new(balance, 2),
                monthly_payment: Decimal::new(payment, 2),
                annual_rate: Decimal::new(35, 1),
            });
        }
        state.settings.local_cash = cash;

        let bundle = export_bundle(state.clone(), Vec::new(), Vec::new(), Utc::now());
        let json = serde_json::to_string(&bundle).unwrap();
        let parsed = parse_bundle(&json).unwrap();
        prop_assert_eq!(parsed.state, state);
    }
}
