//! Statistics data models
//!
//! This module contains the data types exchanged with the statistics service:
//! - `domain` - The statistical domains a view can show (Domain)
//! - `keys` - Well-known figure keys per domain
//! - `query` - Snapshot query parameters (SnapshotQuery)
//! - `snapshot` - Per-year snapshots and their shared numeric schema

mod domain;
pub mod keys;
mod query;
mod snapshot;

pub use domain::Domain;
pub use query::SnapshotQuery;
pub use snapshot::{Breakdown, CategoryEntry, DetailEntry, SnapshotFigures, YearSnapshot};
