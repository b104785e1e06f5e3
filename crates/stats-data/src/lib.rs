//! Fiscalboard Statistics Data Crate
//!
//! This crate defines the data exchanged with the remote statistics service
//! that backs the Fiscalboard dashboard views.
//!
//! # Overview
//!
//! - Four statistical domains: trade, economy structure, revenue sources, expenditure
//! - One numeric schema ([`SnapshotFigures`]) shared by every domain, so single-year
//!   and range results render through the same code
//! - A transport-agnostic [`StatsSource`] trait the host implements
//!
//! # Core Types
//!
//! - [`YearSnapshot`] - One domain's data for exactly one year
//! - [`SnapshotFigures`] - Totals, ratios, year-over-year changes and breakdowns
//! - [`Breakdown`] / [`CategoryEntry`] / [`DetailEntry`] - Sibling groups with shares
//! - [`SnapshotQuery`] - Which year to fetch
//! - [`StatsError`] - Failures reported by a source
//! - [`decode_snapshot`] - Shared decoding of raw service responses

pub mod errors;
pub mod models;
pub mod source;

pub use errors::StatsError;
pub use models::keys;
pub use models::{
    Breakdown, CategoryEntry, DetailEntry, Domain, SnapshotFigures, SnapshotQuery, YearSnapshot,
};
pub use source::{decode_snapshot, StatsSource};
