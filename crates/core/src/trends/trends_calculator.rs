use chrono::DateTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::trends_model::{Drawdown, GrowthProjection, TimeRange, WaveAnalysis};
use crate::constants::DECIMAL_PRECISION;
use crate::snapshots::Snapshot;
use crate::utils::decimal_utils::{div, mul, sub};

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_MONTH: Decimal = dec!(30);
const DAYS_PER_YEAR: Decimal = dec!(365);

/// `part / whole * 100` rounded, or zero when undefined.
fn share_percent(part: Decimal, whole: Decimal) -> Decimal {
    div(part, whole)
        .map_or(Decimal::ZERO, |ratio| mul(ratio, Decimal::ONE_HUNDRED))
        .round_dp(DECIMAL_PRECISION)
}

fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    share_percent(sub(to, from), from)
}

/// High/low/current analysis of net worth. `None` for an empty series.
///
/// Ties resolve to the earliest snapshot. The series is expected in ascending
/// key order; "current" is its last element.
pub fn wave_analysis(series: &[Snapshot]) -> Option<WaveAnalysis> {
    let current = series.last()?;
    let mut high = current;
    let mut low = current;
    for s in series {
        if s.net_worth > high.net_worth || (s.net_worth == high.net_worth && s.key < high.key) {
            high = s;
        }
        if s.net_worth < low.net_worth || (s.net_worth == low.net_worth && s.key < low.key) {
            low = s;
        }
    }

    let span = sub(high.net_worth, low.net_worth);
    let current_position = if span.is_zero() {
        dec!(50)
    } else {
        share_percent(sub(current.net_worth, low.net_worth), span)
    };
    let distance_from_high = share_percent(sub(high.net_worth, current.net_worth), high.net_worth);

    Some(WaveAnalysis {
        high: high.net_worth,
        high_key: high.key,
        low: low.net_worth,
        low_key: low.key,
        current: current.net_worth,
        current_key: current.key,
        current_position,
        distance_from_high,
        distance_from_low: percent_change(low.net_worth, current.net_worth),
    })
}

/// Snapshots whose timestamp falls within `range` of `now`.
pub fn filter_range<'a>(series: &'a [Snapshot], range: TimeRange, now: DateTime<Tz>) -> Vec<&'a Snapshot> {
    match range.days() {
        Some(days) => {
            let cutoff = now.timestamp() - days * SECONDS_PER_DAY;
            series.iter().filter(|s| s.timestamp >= cutoff).collect()
        }
        None => series.iter().collect(),
    }
}

/// Whole days between two unix timestamps, rounded up, at least 1.
pub fn day_span(first: i64, last: i64) -> i64 {
    let seconds = (last - first).max(0);
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days.max(1)
}

/// Linear growth rates over the `range` window ending at `now`.
/// Returns `None` when the window holds fewer than two snapshots.
pub fn growth_projection(
    series: &[Snapshot],
    range: TimeRange,
    now: DateTime<Tz>,
) -> Option<GrowthProjection> {
    let window = filter_range(series, range, now);
    if window.len() < 2 {
        return None;
    }
    let first = window.first()?;
    let last = window.last()?;

    let days = day_span(first.timestamp, last.timestamp);
    let pct = if first.net_worth <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        percent_change(first.net_worth, last.net_worth)
    };
    let daily_rate = div(pct, Decimal::from(days))
        .unwrap_or(Decimal::ZERO)
        .round_dp(DECIMAL_PRECISION);

    Some(GrowthProjection {
        range,
        start_key: first.key,
        end_key: last.key,
        start_value: first.net_worth,
        end_value: last.net_worth,
        point_count: window.len(),
        days,
        absolute_change: sub(last.net_worth, first.net_worth),
        percent_change: pct,
        daily_rate,
        monthly_rate: mul(daily_rate, DAYS_PER_MONTH),
        annual_rate: mul(daily_rate, DAYS_PER_YEAR),
    })
}

/// Maximum drawdown of net worth over the series. `None` for an empty series.
/// Peaks at or below zero are skipped as reference points.
pub fn max_drawdown(series: &[Snapshot]) -> Option<Drawdown> {
    let first = series.first()?;
    let mut peak = first;
    let mut worst = Drawdown {
        peak_key: first.key,
        peak_value: first.net_worth,
        trough_key: first.key,
        trough_value: first.net_worth,
        drawdown_percent: Decimal::ZERO,
    };

    for s in series {
        if s.net_worth > peak.net_worth {
            peak = s;
            continue;
        }
        if peak.net_worth <= Decimal::ZERO {
            continue;
        }
        let decline = share_percent(sub(peak.net_worth, s.net_worth), peak.net_worth);
        if decline > worst.drawdown_percent {
            worst = Drawdown {
                peak_key: peak.key,
                peak_value: peak.net_worth,
                trough_key: s.key,
                trough_value: s.net_worth,
                drawdown_percent: decline,
            };
        }
    }
    Some(worst)
}
