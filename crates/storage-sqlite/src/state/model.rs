//! Database model for the key/value application state table.

use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::app_state)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppStateDB {
    pub state_key: String,
    pub state_value: String,
    pub updated_at: NaiveDateTime,
}
