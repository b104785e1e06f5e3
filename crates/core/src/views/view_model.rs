//! View selection, lifecycle and load ticket models.

use std::sync::Arc;

use fiscalboard_stats_data::YearSnapshot;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::range::YearRange;

/// Whether a view shows one year or a merged range of years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    SingleYear,
    Range,
}

/// What the user asked to see. Years are kept as requested; they are
/// resolved against the available years when a load runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub mode: Mode,
    /// Requested single year; latest when unset
    pub year: Option<i32>,
    /// Requested range bounds, possibly unordered; whole dataset when unset
    pub range: Option<(i32, i32)>,
}

impl Selection {
    /// The load this selection calls for.
    pub fn request(&self) -> LoadRequest {
        match self.mode {
            Mode::SingleYear => match self.year {
                Some(year) => LoadRequest::Year(year),
                None => LoadRequest::Latest,
            },
            Mode::Range => match self.range {
                Some((from, to)) => LoadRequest::Range { from, to },
                None => LoadRequest::FullRange,
            },
        }
    }
}

/// User actions a view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Initial load on mount
    Load,
    YearChanged(i32),
    RangeChanged(i32, i32),
    ModeChanged(Mode),
    /// Repeat the current selection after a failure
    Retry,
}

/// View lifecycle: `Idle -> Loading -> Ready`, `Loading -> Error -> Loading`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Which years a load needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    Latest,
    Year(i32),
    Range { from: i32, to: i32 },
    FullRange,
}

impl LoadRequest {
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. } | Self::FullRange)
    }
}

/// A load issued for one selection generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub request: LoadRequest,
}

/// Snapshots fetched for a ticket, with the range they were resolved to.
#[derive(Debug, Clone)]
pub struct LoadedYears {
    pub range: YearRange,
    /// One snapshot per covered year, ascending
    pub snapshots: Vec<Arc<YearSnapshot>>,
}

/// The settled result of a ticket, tagged with the generation that issued it.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub generation: u64,
    pub request: LoadRequest,
    pub result: Result<LoadedYears>,
}

/// What [`apply`](super::DashboardView::apply) did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// The outcome became the active snapshot
    Installed,
    /// The outcome failed; the previous snapshot stays active
    Failed,
    /// The outcome belongs to a superseded selection and was dropped
    Discarded,
}
