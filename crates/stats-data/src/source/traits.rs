//! Statistics source trait definition.

use async_trait::async_trait;

use crate::errors::StatsError;
use crate::models::{Domain, SnapshotQuery, YearSnapshot};

/// Trait for the remote statistics service.
///
/// Implement this trait to plug a transport (HTTP, fixtures, a test double)
/// into the aggregation engine. The engine treats the source as opaque: it
/// only issues one query per domain and year and never retries on its own.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fiscalboard_stats_data::{Domain, SnapshotQuery, StatsError, StatsSource, YearSnapshot};
///
/// struct ApiSource {
///     base_url: String,
/// }
///
/// #[async_trait]
/// impl StatsSource for ApiSource {
///     fn id(&self) -> &'static str {
///         "STATS_API"
///     }
///
///     async fn query(
///         &self,
///         domain: Domain,
///         query: SnapshotQuery,
///     ) -> Result<YearSnapshot, StatsError> {
///         // ... issue the request, then
///         // fiscalboard_stats_data::decode_snapshot(status, &body)
///     }
/// }
/// ```
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Identifier used in log lines.
    fn id(&self) -> &'static str;

    /// Fetch one domain's snapshot.
    ///
    /// # Arguments
    ///
    /// * `domain` - The statistical domain to query
    /// * `query` - The requested year (latest when omitted) and optional start year
    ///
    /// # Returns
    ///
    /// The snapshot for the requested year, or a `StatsError` on failure.
    async fn query(
        &self,
        domain: Domain,
        query: SnapshotQuery,
    ) -> Result<YearSnapshot, StatsError>;
}
