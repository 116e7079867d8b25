//! Capture policy and bounded retention for the snapshot series.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;

use super::snapshot_model::{Snapshot, SnapshotKey};
use crate::constants::{CAPTURE_AFTER_HOUR, CAPTURE_BEFORE_HOUR, MAX_INTRADAY_SNAPSHOTS};

/// True outside the trading session.
pub fn in_capture_window(now: NaiveDateTime) -> bool {
    let hour = now.hour();
    hour >= CAPTURE_AFTER_HOUR || hour < CAPTURE_BEFORE_HOUR
}

/// One capture per calendar date, taken only outside the trading session.
pub fn should_capture(now: NaiveDateTime, last_capture_date: Option<NaiveDate>) -> bool {
    last_capture_date != Some(now.date()) && in_capture_window(now)
}

/// Merges `incoming` into `series` and enforces retention:
///
/// - every date other than `today` keeps only its chronologically last entry,
///   re-keyed to the compacted (date-only) form;
/// - existing entries for `today` are trimmed, oldest first, to make room so
///   that at most `MAX_INTRADAY_SNAPSHOTS` remain once `incoming` is added;
/// - the result is sorted ascending by key.
///
/// An existing entry with the same key as `incoming` is replaced.
pub fn apply_retention(series: Vec<Snapshot>, incoming: Snapshot, today: NaiveDate) -> Vec<Snapshot> {
    let existing: Vec<Snapshot> = series
        .into_iter()
        .filter(|s| s.key != incoming.key)
        .collect();

    if incoming.date() != today {
        let mut merged = existing;
        merged.push(incoming);
        return normalize_series(merged, today);
    }

    let mut retained = normalize_series(existing, today);
    let todays = retained.iter().filter(|s| s.date() == today).count();
    let excess = (todays + 1).saturating_sub(MAX_INTRADAY_SNAPSHOTS);
    if excess > 0 {
        let mut dropped = 0;
        retained.retain(|s| {
            if dropped < excess && s.date() == today {
                dropped += 1;
                false
            } else {
                true
            }
        });
    }

    retained.push(incoming);
    retained.sort_by_key(|s| s.key);
    retained
}

/// Enforces retention on a series without adding to it (also used after
/// import). Duplicate keys keep the later entry in input order.
pub fn normalize_series(series: Vec<Snapshot>, today: NaiveDate) -> Vec<Snapshot> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<SnapshotKey, Snapshot>> = BTreeMap::new();
    for snapshot in series {
        by_date
            .entry(snapshot.date())
            .or_default()
            .insert(snapshot.key, snapshot);
    }

    let mut out = Vec::new();
    for (date, group) in by_date {
        if date == today {
            let excess = group.len().saturating_sub(MAX_INTRADAY_SNAPSHOTS);
            out.extend(group.into_values().skip(excess));
        } else if let Some((_, mut last)) = group.into_iter().next_back() {
            last.key = last.key.compact();
            out.push(last);
        }
    }
    out
}
