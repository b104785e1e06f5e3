//! Per-year trend series read from already-fetched snapshots.

use std::borrow::Borrow;

use fiscalboard_stats_data::{SnapshotFigures, YearSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single point in a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub year: i32,
    /// `None` when the year does not report the value
    pub value: Option<Decimal>,
}

fn series_by<S, F>(snapshots: &[S], read: F) -> Vec<SeriesPoint>
where
    S: Borrow<YearSnapshot>,
    F: Fn(&SnapshotFigures) -> Option<Decimal>,
{
    let mut points: Vec<SeriesPoint> = snapshots
        .iter()
        .map(|s| {
            let snapshot = s.borrow();
            SeriesPoint {
                year: snapshot.selected_year,
                value: read(&snapshot.figures),
            }
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points.dedup_by_key(|p| p.year);
    points
}

/// Yearly values of a total, ascending by year.
pub fn total_series<S: Borrow<YearSnapshot>>(snapshots: &[S], key: &str) -> Vec<SeriesPoint> {
    series_by(snapshots, |figures| figures.total(key))
}

/// Yearly values of a ratio, ascending by year.
pub fn ratio_series<S: Borrow<YearSnapshot>>(snapshots: &[S], key: &str) -> Vec<SeriesPoint> {
    series_by(snapshots, |figures| figures.ratio(key))
}

/// Yearly amounts of one category/partner within a breakdown, ascending by year.
pub fn entry_series<S: Borrow<YearSnapshot>>(
    snapshots: &[S],
    breakdown_key: &str,
    entry_id: &str,
) -> Vec<SeriesPoint> {
    series_by(snapshots, |figures| {
        figures
            .breakdown(breakdown_key)
            .and_then(|b| b.entry(entry_id))
            .map(|e| e.amount)
    })
}
