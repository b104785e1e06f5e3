//! Resolves per-year snapshots from the cache or the statistics source.

use std::sync::Arc;

use fiscalboard_stats_data::{Domain, SnapshotQuery, StatsError, StatsSource, YearSnapshot};
use futures::future::join_all;
use log::{debug, info, warn};

use crate::aggregation::{entry_series, ratio_series, total_series, SeriesPoint};
use crate::errors::{Error, Result};
use crate::range::{resolve_year, YearRange};
use crate::views::{LoadOutcome, LoadRequest, LoadTicket, LoadedYears};

use super::snapshot_cache::SnapshotCache;

/// Cache-aside access to one domain's per-year snapshots.
///
/// Concurrent requests for the same uncached year are not deduplicated: each
/// one queries the source and both write the same slot, so the cache still
/// ends up with a single snapshot for that year.
pub struct YearFetcher {
    source: Arc<dyn StatsSource>,
    cache: Arc<SnapshotCache>,
}

impl YearFetcher {
    pub fn new(source: Arc<dyn StatsSource>, cache: Arc<SnapshotCache>) -> Self {
        Self { source, cache }
    }

    pub fn domain(&self) -> Domain {
        self.cache.domain()
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// Returns the snapshot for `year`, querying the source only on a cache miss.
    pub async fn fetch_year(&self, year: i32) -> Result<Arc<YearSnapshot>> {
        if let Some(snapshot) = self.cache.get(year) {
            debug!("Cache hit for {} snapshot {}", self.domain(), year);
            return Ok(snapshot);
        }

        info!(
            "Fetching {} snapshot for {} from '{}'",
            self.domain(),
            year,
            self.source.id()
        );
        let snapshot = self.query(SnapshotQuery::for_year(year)).await?;
        Ok(self.cache.insert(snapshot))
    }

    /// Returns the latest published snapshot.
    ///
    /// Served from the cache when a cached snapshot already names the latest
    /// year and that year is cached; otherwise the source picks the year.
    pub async fn fetch_latest(&self) -> Result<Arc<YearSnapshot>> {
        if let Some(year) = self.cache.latest_known_year() {
            if let Some(snapshot) = self.cache.get(year) {
                debug!("Cache hit for latest {} snapshot {}", self.domain(), year);
                return Ok(snapshot);
            }
        }

        info!(
            "Fetching latest {} snapshot from '{}'",
            self.domain(),
            self.source.id()
        );
        let snapshot = self.query(SnapshotQuery::latest()).await?;
        Ok(self.cache.insert(snapshot))
    }

    /// Fetches every requested year concurrently and waits for all of them.
    ///
    /// Snapshots come back in the order of `years`. If any year fails the
    /// whole call fails; years that did succeed stay cached.
    pub async fn fetch_years(&self, years: &[i32]) -> Result<Vec<Arc<YearSnapshot>>> {
        if let Some(cached) = self.cache.get_all(years) {
            debug!(
                "All {} {} snapshots served from cache",
                years.len(),
                self.domain()
            );
            return Ok(cached);
        }

        let results = join_all(years.iter().map(|year| self.fetch_year(*year))).await;

        let failures = results.iter().filter(|r| r.is_err()).count();
        if failures > 0 {
            warn!(
                "{} of {} {} year fetches failed, dropping the range",
                failures,
                years.len(),
                self.domain()
            );
        }
        results.into_iter().collect()
    }

    /// Runs a load ticket to completion.
    ///
    /// The available years come from the latest snapshot (cached after the
    /// first load), the request is resolved against them and every covered
    /// year is fetched. The outcome carries the ticket's generation so the
    /// view can drop it if the selection moved on meanwhile.
    pub async fn resolve(&self, ticket: LoadTicket) -> LoadOutcome {
        LoadOutcome {
            generation: ticket.generation,
            request: ticket.request,
            result: self.load(ticket.request).await,
        }
    }

    async fn load(&self, request: LoadRequest) -> Result<LoadedYears> {
        let latest = self.fetch_latest().await?;
        let available = latest.available_years.as_slice();

        match request {
            LoadRequest::Latest => Ok(LoadedYears {
                range: YearRange::single(latest.selected_year),
                snapshots: vec![Arc::clone(&latest)],
            }),
            LoadRequest::Year(requested) => {
                let year = resolve_year(requested, available)
                    .ok_or(Error::NoAvailableYears(self.domain()))?;
                if year != requested {
                    debug!(
                        "Requested {} year {} resolved to {}",
                        self.domain(),
                        requested,
                        year
                    );
                }
                let snapshot = self.fetch_year(year).await?;
                Ok(LoadedYears {
                    range: YearRange::single(year),
                    snapshots: vec![snapshot],
                })
            }
            LoadRequest::Range { from, to } => self.load_range(from, to, available).await,
            LoadRequest::FullRange => {
                self.load_range(latest.since_year, latest.to_year, available)
                    .await
            }
        }
    }

    async fn load_range(&self, from: i32, to: i32, available: &[i32]) -> Result<LoadedYears> {
        let range = YearRange::resolve(from, to, available)
            .ok_or(Error::NoAvailableYears(self.domain()))?;
        let years = range.covered_years(available)?;
        let snapshots = self.fetch_years(&years).await?;
        Ok(LoadedYears { range, snapshots })
    }

    async fn query(&self, query: SnapshotQuery) -> Result<YearSnapshot> {
        let snapshot = self
            .source
            .query(self.domain(), query)
            .await
            .map_err(|e| {
                warn!(
                    "Query {:?} for {} via '{}' failed: {}",
                    query,
                    self.domain(),
                    self.source.id(),
                    e
                );
                e
            })?;
        self.validate(snapshot, query.year)
    }

    /// Rejects payloads that would corrupt the cache: another domain's data,
    /// or a different year than the one asked for.
    fn validate(
        &self,
        snapshot: YearSnapshot,
        requested_year: Option<i32>,
    ) -> Result<YearSnapshot> {
        if snapshot.domain != self.domain() {
            return Err(StatsError::InvalidPayload(format!(
                "expected {} snapshot, got {}",
                self.domain(),
                snapshot.domain
            ))
            .into());
        }
        if let Some(year) = requested_year {
            if snapshot.selected_year != year {
                return Err(StatsError::InvalidPayload(format!(
                    "requested {} {}, got {}",
                    self.domain(),
                    year,
                    snapshot.selected_year
                ))
                .into());
            }
        }
        Ok(snapshot.normalized())
    }

    /// Yearly values of a total across every cached year; never fetches.
    pub fn cached_series(&self, key: &str) -> Vec<SeriesPoint> {
        total_series(&self.cache.snapshots(), key)
    }

    /// Yearly values of a ratio across every cached year; never fetches.
    pub fn cached_ratio_series(&self, key: &str) -> Vec<SeriesPoint> {
        ratio_series(&self.cache.snapshots(), key)
    }

    /// Yearly amounts of one breakdown entry across every cached year; never fetches.
    pub fn cached_entry_series(&self, breakdown_key: &str, entry_id: &str) -> Vec<SeriesPoint> {
        entry_series(&self.cache.snapshots(), breakdown_key, entry_id)
    }
}
