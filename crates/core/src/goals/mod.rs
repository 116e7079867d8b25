//! Goals module - net-worth targets, progress and time-to-goal estimates.

mod goals_calculator;
mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_calculator::{goal_eta, goal_progress};
pub use goals_model::{Goal, GoalEta, GoalOutlook, GoalProgress, NewGoal};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};

#[cfg(test)]
mod goals_tests;
