//! Tests for goal progress, ETA and the goal service.

use super::*;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockGoalRepository {
    goals: Mutex<Vec<Goal>>,
}

#[async_trait]
impl GoalRepositoryTrait for MockGoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.lock().unwrap().clone())
    }

    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal> {
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
        let mut goals = self.goals.lock().unwrap();
        match goals.iter_mut().find(|g| g.id == goal_update.id) {
            Some(existing) => {
                *existing = goal_update.clone();
                Ok(goal_update)
            }
            None => Err(Error::NotFound(goal_update.id)),
        }
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id_to_delete);
        Ok(before - goals.len())
    }

    async fn replace_goals(&self, goals: Vec<Goal>) -> Result<()> {
        *self.goals.lock().unwrap() = goals;
        Ok(())
    }
}

fn goal(target: Decimal, deadline: Option<NaiveDate>) -> Goal {
    Goal {
        id: "g1".to_string(),
        name: "First million".to_string(),
        target_amount: target,
        deadline,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        achieved_at: None,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Calculator
// ============================================================================

#[test]
fn test_progress_partial() {
    let p = goal_progress(&goal(dec!(1000000), None), dec!(250000));
    assert_eq!(p.progress, dec!(25));
    assert_eq!(p.remaining, dec!(750000));
    assert!(!p.achieved);
}

#[test]
fn test_progress_caps_at_hundred() {
    let p = goal_progress(&goal(dec!(1000), None), dec!(1500));
    assert_eq!(p.progress, dec!(100));
    assert_eq!(p.remaining, Decimal::ZERO);
    assert!(p.achieved);
}

#[test]
fn test_progress_negative_net_worth_is_zero() {
    let p = goal_progress(&goal(dec!(1000), None), dec!(-50));
    assert_eq!(p.progress, Decimal::ZERO);
    assert_eq!(p.remaining, dec!(1050));
}

#[test]
fn test_progress_non_positive_target_is_achieved() {
    let p = goal_progress(&goal(Decimal::ZERO, None), dec!(10));
    assert!(p.achieved);
    assert_eq!(p.progress, dec!(100));
}

#[test]
fn test_eta_doubling_at_tenth_of_percent() {
    // ln(2) / ln(1.001) = 693.49, rounded up
    let eta = goal_eta(&goal(dec!(1000000), None), dec!(500000), dec!(0.1), day(2024, 1, 1));
    assert_eq!(eta.days(), Some(694));
    match eta {
        GoalEta::Days {
            projected_date,
            on_track,
            ..
        } => {
            assert_eq!(projected_date, day(2025, 11, 25));
            assert_eq!(on_track, None);
        }
        other => panic!("expected days, got {:?}", other),
    }
}

#[test]
fn test_eta_on_track_against_deadline() {
    let today = day(2024, 1, 1);
    let late = goal_eta(&goal(dec!(1000000), Some(day(2024, 12, 31))), dec!(500000), dec!(0.1), today);
    assert!(matches!(late, GoalEta::Days { on_track: Some(false), .. }));

    let early = goal_eta(&goal(dec!(1000000), Some(day(2026, 1, 1))), dec!(500000), dec!(0.1), today);
    assert!(matches!(early, GoalEta::Days { on_track: Some(true), .. }));
}

#[test]
fn test_eta_unreachable_and_achieved() {
    let today = day(2024, 1, 1);
    let g = goal(dec!(1000), None);
    assert_eq!(goal_eta(&g, dec!(500), Decimal::ZERO, today), GoalEta::Unreachable);
    assert_eq!(goal_eta(&g, dec!(500), dec!(-1), today), GoalEta::Unreachable);
    assert_eq!(goal_eta(&g, Decimal::ZERO, dec!(1), today), GoalEta::Unreachable);
    assert_eq!(goal_eta(&g, dec!(1000), dec!(-1), today), GoalEta::Achieved);
    assert_eq!(GoalEta::Achieved.days(), Some(0));
}

#[test]
fn test_eta_serialization_is_tagged() {
    let json = serde_json::to_value(GoalEta::Unreachable).unwrap();
    assert_eq!(json["status"], "unreachable");
}

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn test_create_goal_assigns_id() {
    let service = GoalService::new(Arc::new(MockGoalRepository::default()));
    let created = service
        .create_goal(NewGoal {
            id: None,
            name: "  House  ".to_string(),
            target_amount: dec!(5000000),
            deadline: None,
        })
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.name, "House");
    assert!(!created.is_achieved());
}

#[tokio::test]
async fn test_create_goal_requires_name() {
    let service = GoalService::new(Arc::new(MockGoalRepository::default()));
    let err = service
        .create_goal(NewGoal {
            id: None,
            name: " ".to_string(),
            target_amount: dec!(1),
            deadline: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_mark_achievements_only_stamps_once() {
    let repo = Arc::new(MockGoalRepository::default());
    let service = GoalService::new(repo.clone());
    repo.insert_new_goal(goal(dec!(1000), None)).await.unwrap();
    let mut far = goal(dec!(1000000), None);
    far.id = "g2".to_string();
    repo.insert_new_goal(far).await.unwrap();

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let reached = service.mark_achievements(dec!(2000), now).await.unwrap();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0].achieved_at, Some(now));

    let later = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
    assert!(service.mark_achievements(dec!(3000), later).await.unwrap().is_empty());
    assert_eq!(service.get_goals().unwrap()[0].achieved_at, Some(now));
}

#[tokio::test]
async fn test_outlook_covers_every_goal() {
    let repo = Arc::new(MockGoalRepository::default());
    repo.insert_new_goal(goal(dec!(1000000), None)).await.unwrap();
    let service = GoalService::new(repo);

    let outlook = service.outlook(dec!(500000), dec!(0.1), day(2024, 1, 1)).unwrap();
    assert_eq!(outlook.len(), 1);
    assert_eq!(outlook[0].progress.progress, dec!(50));
    assert_eq!(outlook[0].eta.days(), Some(694));
}
