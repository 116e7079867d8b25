//! Net-worth snapshot domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, ValidationError};
use crate::risk::{AnalysisResult, Leverage};
use crate::utils::decimal_utils::mul;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Identifies a snapshot by calendar date and, while the date is still
/// current, by time of day.
///
/// A key without a time is compacted: the single surviving capture of a
/// past date. Ordering is by date, then time, with the compacted form first,
/// which matches the lexicographic order of the rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl SnapshotKey {
    pub fn intraday(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time: Some(time.with_nanosecond(0).unwrap_or(time)),
        }
    }

    pub fn compacted(date: NaiveDate) -> Self {
        Self { date, time: None }
    }

    pub fn is_compacted(&self) -> bool {
        self.time.is_none()
    }

    pub fn compact(self) -> Self {
        Self::compacted(self.date)
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(time) => write!(
                f,
                "{}-{}",
                self.date.format(DATE_FORMAT),
                time.format(TIME_FORMAT)
            ),
            None => write!(f, "{}", self.date.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for SnapshotKey {
    type Err = Error;

    /// Accepts `YYYY-MM-DD` or `YYYY-MM-DD-HH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Validation(ValidationError::SnapshotKey(s.to_string()));
        let (date_part, time_part) = match s.len() {
            10 => (s, None),
            19 if s.as_bytes()[10] == b'-' => match (s.get(..10), s.get(11..)) {
                (Some(date), Some(time)) => (date, Some(time)),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        };
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| invalid())?;
        match time_part {
            Some(t) => {
                let time = NaiveTime::parse_from_str(t, TIME_FORMAT).map_err(|_| invalid())?;
                Ok(SnapshotKey::intraday(date, time))
            }
            None => Ok(SnapshotKey::compacted(date)),
        }
    }
}

impl Serialize for SnapshotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnapshotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A point-in-time record of the blended figures. Money in local currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(rename = "id")]
    pub key: SnapshotKey,
    /// Unix seconds of the capture
    pub timestamp: i64,
    pub net_worth: Decimal,
    pub gross_assets: Decimal,
    pub total_debt: Decimal,
    pub local_market_value: Decimal,
    pub foreign_market_value: Decimal,
    pub crypto_market_value: Decimal,
    pub local_cash: Decimal,
    pub foreign_cash: Decimal,
    pub crypto_cash: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_percent: Decimal,
    pub leverage: Leverage,
    pub local_utilization: Decimal,
    pub foreign_utilization: Decimal,
    pub crypto_utilization: Decimal,
}

impl Snapshot {
    /// Builds an intraday snapshot of `analysis` at market-local time `now`.
    pub fn capture(analysis: &AnalysisResult, now: DateTime<Tz>) -> Self {
        let local = now.naive_local();
        let round = |d: Decimal| d.round_dp(DECIMAL_PRECISION);
        let leverage = match analysis.real_leverage {
            Leverage::Ratio(r) => Leverage::Ratio(round(r)),
            Leverage::Saturated => Leverage::Saturated,
        };

        Snapshot {
            key: SnapshotKey::intraday(local.date(), local.time()),
            timestamp: now.timestamp(),
            net_worth: round(analysis.net_worth),
            gross_assets: round(analysis.gross_assets),
            total_debt: round(analysis.total_debt),
            local_market_value: round(analysis.local_equity.market_value),
            foreign_market_value: round(analysis.foreign_market_value_local()),
            crypto_market_value: round(analysis.crypto_notional_local()),
            local_cash: round(analysis.local_equity.cash),
            foreign_cash: round(mul(analysis.foreign_equity.cash, analysis.foreign_rate)),
            crypto_cash: round(mul(analysis.crypto.idle_balance, analysis.stablecoin_rate)),
            total_pnl: round(analysis.total_pnl),
            total_pnl_percent: round(analysis.total_pnl_percent),
            leverage,
            local_utilization: round(analysis.local_equity.utilization),
            foreign_utilization: round(analysis.foreign_equity.utilization),
            crypto_utilization: round(analysis.crypto.utilization),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.key.date
    }
}
