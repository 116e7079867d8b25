use chrono::{Days, NaiveDate};
use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use super::goals_model::{Goal, GoalEta, GoalProgress};
use crate::constants::DECIMAL_PRECISION;
use crate::utils::decimal_utils::{div, mul, sub};

/// Progress toward `goal` at net worth `current`.
/// A non-positive target counts as achieved.
pub fn goal_progress(goal: &Goal, current: Decimal) -> GoalProgress {
    let target = goal.target_amount;
    let (progress, achieved) = if target <= Decimal::ZERO {
        (Decimal::ONE_HUNDRED, true)
    } else {
        // Truncate so an unmet target never displays as 100%
        let achieved = current >= target;
        let pct = div(current, target)
            .map_or(Decimal::ZERO, |ratio| mul(ratio, Decimal::ONE_HUNDRED))
            .round_dp_with_strategy(DECIMAL_PRECISION, RoundingStrategy::ToZero);
        let pct = if achieved {
            Decimal::ONE_HUNDRED
        } else {
            pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        };
        (pct, achieved)
    };

    GoalProgress {
        goal_id: goal.id.clone(),
        current,
        target,
        progress,
        remaining: sub(target, current).max(Decimal::ZERO),
        achieved,
    }
}

/// Days until `goal` is reached if net worth keeps compounding at
/// `daily_rate` percent per day, rounded up to whole days.
pub fn goal_eta(goal: &Goal, current: Decimal, daily_rate: Decimal, today: NaiveDate) -> GoalEta {
    if goal_progress(goal, current).achieved {
        return GoalEta::Achieved;
    }
    if daily_rate <= Decimal::ZERO || current <= Decimal::ZERO {
        return GoalEta::Unreachable;
    }

    let Some(growth) = div(daily_rate, Decimal::ONE_HUNDRED)
        .and_then(|rate| rate.checked_add(Decimal::ONE))
    else {
        return GoalEta::Unreachable;
    };
    let (Some(numerator), Some(denominator)) = (
        div(goal.target_amount, current).and_then(|ratio| ratio.checked_ln()),
        growth.checked_ln(),
    ) else {
        return GoalEta::Unreachable;
    };
    if denominator <= Decimal::ZERO {
        return GoalEta::Unreachable;
    }

    let Some(days) = div(numerator, denominator).and_then(|d| d.ceil().to_u64()) else {
        return GoalEta::Unreachable;
    };
    let Some(projected_date) = today.checked_add_days(Days::new(days)) else {
        warn!(
            "Goal '{}' projects {} days out, beyond the calendar range",
            goal.name, days
        );
        return GoalEta::Unreachable;
    };

    GoalEta::Days {
        days,
        projected_date,
        on_track: goal.deadline.map(|deadline| projected_date <= deadline),
    }
}
