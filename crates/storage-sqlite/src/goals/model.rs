//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use marginwatch_core::goals::Goal;

use crate::utils::parse_decimal_column;

/// Database model for goals
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct GoalDB {
    pub id: String,
    pub name: String,
    pub target_amount: String,
    pub deadline: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub achieved_at: Option<NaiveDateTime>,
}

// Conversion to domain models
impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            target_amount: parse_decimal_column("goals.target_amount", &db.target_amount),
            id: db.id,
            name: db.name,
            deadline: db.deadline,
            created_at: db.created_at.and_utc(),
            achieved_at: db.achieved_at.map(|t| t.and_utc()),
        }
    }
}

impl From<Goal> for GoalDB {
    fn from(domain: Goal) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            target_amount: domain.target_amount.to_string(),
            deadline: domain.deadline,
            created_at: domain.created_at.naive_utc(),
            achieved_at: domain.achieved_at.map(|t| t.naive_utc()),
        }
    }
}
