//! Column conversion helpers shared by the repositories.

use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a decimal stored as text. Unreadable values become zero.
pub fn parse_decimal_column(column: &str, raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|e| {
        warn!("Unreadable decimal '{}' in column {}: {}", raw, column, e);
        Decimal::ZERO
    })
}
