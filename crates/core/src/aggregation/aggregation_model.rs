//! Aggregated range results and the provenance-tagged view snapshot.

use std::sync::Arc;

use fiscalboard_stats_data::{Domain, SnapshotFigures, YearSnapshot};
use serde::{Deserialize, Serialize};

use crate::range::YearRange;

/// A snapshot derived from every available year in an inclusive range.
///
/// Shares the numeric schema of [`YearSnapshot`]; `selected_year` is the end
/// year of the range and `since_year`/`to_year` are the range bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSnapshot {
    pub domain: Domain,
    pub selected_year: i32,
    pub since_year: i32,
    pub to_year: i32,
    /// Years the dataset has, as reported by the end-year snapshot
    pub available_years: Vec<i32>,
    /// Years actually merged into this result, ascending
    pub covered_years: Vec<i32>,
    #[serde(flatten)]
    pub figures: SnapshotFigures,
}

impl AggregatedSnapshot {
    pub fn range(&self) -> YearRange {
        YearRange {
            from: self.since_year,
            to: self.to_year,
        }
    }
}

/// What a view hands to the presentation layer.
///
/// Both variants expose the same accessors, so rendering code reads figures
/// the same way whether it shows one year or a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum ViewSnapshot {
    Single(Arc<YearSnapshot>),
    Aggregated(AggregatedSnapshot),
}

impl ViewSnapshot {
    pub fn domain(&self) -> Domain {
        match self {
            Self::Single(s) => s.domain,
            Self::Aggregated(a) => a.domain,
        }
    }

    pub fn selected_year(&self) -> i32 {
        match self {
            Self::Single(s) => s.selected_year,
            Self::Aggregated(a) => a.selected_year,
        }
    }

    pub fn since_year(&self) -> i32 {
        match self {
            Self::Single(s) => s.since_year,
            Self::Aggregated(a) => a.since_year,
        }
    }

    pub fn to_year(&self) -> i32 {
        match self {
            Self::Single(s) => s.to_year,
            Self::Aggregated(a) => a.to_year,
        }
    }

    pub fn available_years(&self) -> &[i32] {
        match self {
            Self::Single(s) => &s.available_years,
            Self::Aggregated(a) => &a.available_years,
        }
    }

    pub fn figures(&self) -> &SnapshotFigures {
        match self {
            Self::Single(s) => &s.figures,
            Self::Aggregated(a) => &a.figures,
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::Aggregated(_))
    }
}

impl From<Arc<YearSnapshot>> for ViewSnapshot {
    fn from(snapshot: Arc<YearSnapshot>) -> Self {
        Self::Single(snapshot)
    }
}

impl From<AggregatedSnapshot> for ViewSnapshot {
    fn from(snapshot: AggregatedSnapshot) -> Self {
        Self::Aggregated(snapshot)
    }
}
