use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};
use crate::snapshots::SnapshotKey;

/// Where current net worth sits between its all-time extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveAnalysis {
    pub high: Decimal,
    pub high_key: SnapshotKey,
    pub low: Decimal,
    pub low_key: SnapshotKey,
    pub current: Decimal,
    pub current_key: SnapshotKey,
    /// 0 at the low, 100 at the high, 50 for a flat series
    pub current_position: Decimal,
    pub distance_from_high: Decimal,
    pub distance_from_low: Decimal,
}

/// Lookback window for growth projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    HalfYear,
    Year,
    All,
}

impl TimeRange {
    /// Window length in days, `None` for the whole history.
    pub fn days(self) -> Option<i64> {
        match self {
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::Quarter => Some(90),
            TimeRange::HalfYear => Some(180),
            TimeRange::Year => Some(365),
            TimeRange::All => None,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeRange::Week => "1w",
            TimeRange::Month => "1m",
            TimeRange::Quarter => "3m",
            TimeRange::HalfYear => "6m",
            TimeRange::Year => "1y",
            TimeRange::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1w" | "week" => Ok(TimeRange::Week),
            "1m" | "month" => Ok(TimeRange::Month),
            "3m" | "quarter" => Ok(TimeRange::Quarter),
            "6m" | "halfyear" => Ok(TimeRange::HalfYear),
            "1y" | "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown time range '{}'",
                other
            )))),
        }
    }
}

/// Linear growth over a window of the snapshot series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthProjection {
    pub range: TimeRange,
    pub start_key: SnapshotKey,
    pub end_key: SnapshotKey,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub point_count: usize,
    pub days: i64,
    pub absolute_change: Decimal,
    pub percent_change: Decimal,
    /// Percent per day
    pub daily_rate: Decimal,
    pub monthly_rate: Decimal,
    pub annual_rate: Decimal,
}

/// Largest peak-to-trough decline of net worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawdown {
    pub peak_key: SnapshotKey,
    pub peak_value: Decimal,
    pub trough_key: SnapshotKey,
    pub trough_value: Decimal,
    /// Positive percent, 0 when net worth never declined
    pub drawdown_percent: Decimal,
}
