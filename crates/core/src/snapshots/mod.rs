//! Per-domain snapshot cache and the fetcher that fills it.

mod snapshot_cache;
mod year_fetcher;


pub use snapshot_cache::{CachedSnapshot, SnapshotCache};
pub use year_fetcher::YearFetcher;
