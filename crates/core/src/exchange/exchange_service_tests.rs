//! Unit tests for export and import.

use super::*;
use crate::errors::{DatabaseError, Error};
use crate::goals::{Goal, GoalRepositoryTrait, GoalService, GoalServiceTrait, NewGoal};
use std::sync::Arc;
use async_trait::async_trait;
use crate::positions::{
    CryptoKind, CryptoPosition, ForeignEquityPosition, PositionServiceTrait, PositionSide,
};
use crate::snapshots::SnapshotServiceTrait;
use crate::test_support::services;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn populated() -> crate::test_support::Services {
    let s = services();
    s.positions
        .upsert_foreign_equity(ForeignEquityPosition {
            id: String::new(),
            symbol: "NVDA".to_string(),
            cost_price: dec!(402.15),
            current_price: dec!(118.33),
            shares: dec!(12.5),
            is_margin: true,
            margin_ratio: dec!(30),
            loan_amount: Decimal::ZERO,
        })
        .await
        .unwrap();
    s.positions
        .upsert_crypto(CryptoPosition {
            id: String::new(),
            symbol: "ETHUSDT".to_string(),
            entry_price: dec!(3120.5),
            current_price: dec!(2980.25),
            kind: CryptoKind::Future {
                margin: dec!(750),
                leverage: dec!(3),
                side: PositionSide::Short,
                liquidation_price: Some(dec!(4100)),
            },
        })
        .await
        .unwrap();
    s.goals
        .create_goal(NewGoal {
            id: None,
            name: "Runway".to_string(),
            target_amount: dec!(2500000.50),
            deadline: None,
        })
        .await
        .unwrap();
    let analysis = s.positions.analyze();
    s.snapshots.force_capture(&analysis).await.unwrap();
    s
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let source = populated().await;
    let exchange = ExchangeService::new(
        source.positions.clone(),
        source.snapshots.clone(),
        source.goals.clone(),
    );
    let json = exchange.export_json().unwrap();

    let target = services();
    let importer = ExchangeService::new(
        target.positions.clone(),
        target.snapshots.clone(),
        target.goals.clone(),
    );
    let summary = importer.import_json(&json).await.unwrap();
    assert_eq!(summary.positions, 2);
    assert_eq!(summary.snapshots, 1);
    assert_eq!(summary.goals, 1);

    let mut expected = source.positions.get_state();
    let actual = target.positions.get_state();
    expected.version = actual.version;
    assert_eq!(actual, expected);
    assert_eq!(target.snapshots.list().unwrap(), source.snapshots.list().unwrap());
    assert_eq!(target.goals.get_goals().unwrap(), source.goals.get_goals().unwrap());
}

#[test]
fn test_bundle_json_is_lossless() {
    let exported_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let bundle = export_bundle(Default::default(), Vec::new(), Vec::new(), exported_at);
    let json = serde_json::to_string(&bundle).unwrap();
    assert_eq!(parse_bundle(&json).unwrap(), bundle);
}

#[test]
fn test_parse_rejects_newer_format() {
    let raw = r#"{"formatVersion":99,"exportedAt":"2024-05-01T08:00:00Z","state":{}}"#;
    let err = parse_bundle(raw).unwrap_err();
    assert!(matches!(err, Error::Import(_)));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(matches!(parse_bundle("not json"), Err(Error::Import(_))));
}

#[test]
fn test_missing_collections_default_to_empty() {
    let raw = r#"{"formatVersion":1,"exportedAt":"2024-05-01T08:00:00Z","state":{"debts":[]}}"#;
    let bundle = parse_bundle(raw).unwrap();
    assert!(bundle.snapshots.is_empty());
    assert!(bundle.goals.is_empty());
}

fn goal(id: &str, name: &str) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        target_amount: dec!(1000000),
        deadline: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        achieved_at: None,
    }
}

#[test]
fn test_validate_rejects_blank_and_duplicate_goals() {
    let exported_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let mut bundle = export_bundle(Default::default(), Vec::new(), Vec::new(), exported_at);

    bundle.goals = vec![goal("a", "House"), goal("b", "Car")];
    assert!(validate_bundle(&bundle).is_ok());

    bundle.goals = vec![goal("a", "House"), goal("a", "Car")];
    assert!(matches!(validate_bundle(&bundle), Err(Error::Import(_))));

    bundle.goals = vec![goal("a", "  ")];
    assert!(matches!(validate_bundle(&bundle), Err(Error::Import(_))));

    bundle.goals = vec![goal("", "House")];
    assert!(matches!(validate_bundle(&bundle), Err(Error::Import(_))));
}

#[tokio::test]
async fn test_invalid_bundle_changes_nothing() {
    let target = populated().await;
    let before_state = target.positions.get_state();
    let before_snapshots = target.snapshots.list().unwrap();

    let exporter = ExchangeService::new(
        target.positions.clone(),
        target.snapshots.clone(),
        target.goals.clone(),
    );
    let mut bundle = exporter.export().unwrap();
    bundle.state = Default::default();
    bundle.snapshots.clear();
    bundle.goals.push(goal("dup", "One"));
    bundle.goals.push(goal("dup", "Two"));

    let err = exporter.import(bundle).await.unwrap_err();
    assert!(matches!(err, Error::Import(_)));
    assert_eq!(target.positions.get_state(), before_state);
    assert_eq!(target.snapshots.list().unwrap(), before_snapshots);
    assert_eq!(target.goals.get_goals().unwrap().len(), 1);
}

/// Goal storage that accepts reads but refuses a bulk replace.
struct RejectingGoalRepository;

#[async_trait]
impl GoalRepositoryTrait for RejectingGoalRepository {
    fn load_goals(&self) -> crate::errors::Result<Vec<Goal>> {
        Ok(Vec::new())
    }

    async fn insert_new_goal(&self, goal: Goal) -> crate::errors::Result<Goal> {
        Ok(goal)
    }

    async fn update_goal(&self, goal_update: Goal) -> crate::errors::Result<Goal> {
        Ok(goal_update)
    }

    async fn delete_goal(&self, _goal_id_to_delete: String) -> crate::errors::Result<usize> {
        Ok(0)
    }

    async fn replace_goals(&self, _goals: Vec<Goal>) -> crate::errors::Result<()> {
        Err(DatabaseError::TransactionFailed("goals table locked".to_string()).into())
    }
}

#[tokio::test]
async fn test_failed_goal_replace_rolls_back_snapshots_and_keeps_state() {
    let source = populated().await;
    let bundle = ExchangeService::new(
        source.positions.clone(),
        source.snapshots.clone(),
        source.goals.clone(),
    )
    .export()
    .unwrap();

    let target = services();
    let importer = ExchangeService::new(
        target.positions.clone(),
        target.snapshots.clone(),
        Arc::new(GoalService::new(Arc::new(RejectingGoalRepository))),
    );

    let err = importer.import(bundle).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert!(target.snapshots.list().unwrap().is_empty());
    assert!(target.positions.get_state().is_empty());
    assert_eq!(target.positions.get_state().version, 0);
}
