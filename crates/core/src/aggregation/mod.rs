//! Range aggregation: merging per-year snapshots into one range result.

mod aggregation_model;
mod aggregation_policy;
mod detail_rollup;
mod range_aggregator;
mod series;
mod shares;

#[cfg(test)]
mod range_aggregator_tests;

pub use aggregation_model::{AggregatedSnapshot, ViewSnapshot};
pub use aggregation_policy::{AggregationPolicy, DerivedShare};
pub use detail_rollup::roll_up_details;
pub use range_aggregator::aggregate_range;
pub use series::{entry_series, ratio_series, total_series, SeriesPoint};
pub use shares::{apportion_shares, percentage_of, recompute_shares, shares_balanced};
