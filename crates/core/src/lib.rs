//! Fiscalboard Core - Snapshot caching, range aggregation and view state.
//!
//! This crate turns per-year statistics snapshots into what a dashboard view
//! shows. It is transport-agnostic: snapshots arrive through the
//! `StatsSource` trait defined in `fiscalboard-stats-data`.
//!
//! - [`snapshots`] caches one domain's snapshots per year and fetches missing ones
//! - [`range`] resolves requested years and ranges against the available years
//! - [`aggregation`] merges the years of a range into one snapshot
//! - [`views`] drives selection changes, load generations and error display
//! - [`settings`] loads per-domain aggregation policies

pub mod aggregation;
pub mod constants;
pub mod errors;
pub mod range;
pub mod settings;
pub mod snapshots;
pub mod views;

pub use aggregation::{aggregate_range, AggregatedSnapshot, AggregationPolicy, ViewSnapshot};
pub use range::YearRange;
pub use snapshots::{SnapshotCache, YearFetcher};
pub use views::{DashboardView, Mode, ViewEvent, ViewState};

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
