//! Engine configuration: per-domain aggregation policies.

mod dashboard_config;

pub use dashboard_config::{DashboardConfig, DETAIL_LIMIT_ENV, POLICY_FILE_ENV};
