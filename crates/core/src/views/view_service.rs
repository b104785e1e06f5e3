use std::sync::Arc;

use fiscalboard_stats_data::{Domain, StatsSource, YearSnapshot};
use log::{debug, info, warn};

use crate::aggregation::{aggregate_range, AggregatedSnapshot, AggregationPolicy, ViewSnapshot};
use crate::errors::{Error, Result};
use crate::range::YearRange;
use crate::settings::DashboardConfig;
use crate::snapshots::{SnapshotCache, YearFetcher};

use super::view_model::{
    ApplyStatus, LoadOutcome, LoadTicket, LoadedYears, Mode, Selection, ViewEvent, ViewState,
};

/// One dashboard view: a domain, its cache and whatever it currently shows.
///
/// Loads run in two phases so that overlapping selections can be expressed:
/// [`begin`](Self::begin) hands out a ticket for the new selection, the
/// ticket is resolved against [`fetcher`](Self::fetcher) (possibly while other
/// tickets are in flight), and [`apply`](Self::apply) installs the outcome
/// only if no newer selection was made in the meantime.
pub struct DashboardView {
    domain: Domain,
    source: Arc<dyn StatsSource>,
    fetcher: Arc<YearFetcher>,
    policy: AggregationPolicy,
    selection: Selection,
    state: ViewState,
    active: Option<ViewSnapshot>,
    resolved_range: Option<YearRange>,
    last_single: Option<Arc<YearSnapshot>>,
    last_aggregated: Option<AggregatedSnapshot>,
    last_error: Option<Error>,
    generation: u64,
}

impl DashboardView {
    pub fn new(domain: Domain, source: Arc<dyn StatsSource>, policy: AggregationPolicy) -> Self {
        let fetcher = Arc::new(YearFetcher::new(
            Arc::clone(&source),
            Arc::new(SnapshotCache::new(domain)),
        ));
        Self {
            domain,
            source,
            fetcher,
            policy,
            selection: Selection::default(),
            state: ViewState::Idle,
            active: None,
            resolved_range: None,
            last_single: None,
            last_aggregated: None,
            last_error: None,
            generation: 0,
        }
    }

    /// Creates a view using the configured policy for `domain`.
    pub fn with_config(
        domain: Domain,
        source: Arc<dyn StatsSource>,
        config: &DashboardConfig,
    ) -> Self {
        Self::new(domain, source, config.policy(domain))
    }

    /// Applies a user event to the selection and issues a load for it.
    ///
    /// Returns `None` when the event does not change what is shown: a mode
    /// change to the current mode, a year change while in range mode, or a
    /// range change while in single-year mode. The latter two still update
    /// the selection so switching modes picks them up.
    pub fn begin(&mut self, event: ViewEvent) -> Option<LoadTicket> {
        match event {
            ViewEvent::Load | ViewEvent::Retry => {}
            ViewEvent::YearChanged(year) => {
                self.selection.year = Some(year);
                if self.selection.mode != Mode::SingleYear {
                    return None;
                }
            }
            ViewEvent::RangeChanged(from, to) => {
                self.selection.range = Some((from, to));
                if self.selection.mode != Mode::Range {
                    return None;
                }
            }
            ViewEvent::ModeChanged(mode) => {
                if mode == self.selection.mode {
                    return None;
                }
                self.selection.mode = mode;
                self.swap_to_retained();
            }
        }

        Some(self.issue_ticket())
    }

    /// Installs the outcome of a ticket if it is still current.
    pub fn apply(&mut self, outcome: LoadOutcome) -> ApplyStatus {
        if outcome.generation != self.generation {
            warn!(
                "Discarding stale {} load (generation {}, current {})",
                self.domain, outcome.generation, self.generation
            );
            return ApplyStatus::Discarded;
        }

        let loaded = match outcome.result {
            Ok(loaded) => loaded,
            Err(e) => return self.fail(e),
        };

        let installed = if outcome.request.is_range() {
            self.install_aggregated(loaded)
        } else {
            self.install_single(loaded)
        };
        match installed {
            Ok(()) => {
                self.state = ViewState::Ready;
                self.last_error = None;
                ApplyStatus::Installed
            }
            Err(e) => self.fail(e),
        }
    }

    /// Runs `begin`, the fetch and `apply` in sequence.
    ///
    /// Returns the load error when the outcome failed; the view keeps its
    /// previous snapshot in that case.
    pub async fn dispatch(&mut self, event: ViewEvent) -> Result<()> {
        let Some(ticket) = self.begin(event) else {
            return Ok(());
        };
        let fetcher = Arc::clone(&self.fetcher);
        let outcome = fetcher.resolve(ticket).await;

        match (self.apply(outcome), &self.last_error) {
            (ApplyStatus::Failed, Some(error)) => Err(error.clone()),
            _ => Ok(()),
        }
    }

    /// Drops every cached year and issues a fresh load for the current selection.
    ///
    /// Loads issued before the reload are discarded when they settle, so
    /// nothing fetched against the old cache can be installed afterwards.
    pub fn reload(&mut self) -> LoadTicket {
        info!("Reloading {} view", self.domain);
        self.fetcher = Arc::new(YearFetcher::new(
            Arc::clone(&self.source),
            Arc::new(SnapshotCache::new(self.domain)),
        ));
        self.issue_ticket()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn active(&self) -> Option<&ViewSnapshot> {
        self.active.as_ref()
    }

    /// The range (or single year) the active snapshot was resolved to.
    pub fn resolved_range(&self) -> Option<YearRange> {
        self.resolved_range
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn policy(&self) -> &AggregationPolicy {
        &self.policy
    }

    /// The fetcher tickets are resolved with. Replaced by [`reload`](Self::reload).
    pub fn fetcher(&self) -> Arc<YearFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        self.fetcher.cache()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn issue_ticket(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        let request = self.selection.request();
        debug!(
            "Issuing {} load {:?} (generation {})",
            self.domain, request, self.generation
        );
        LoadTicket {
            generation: self.generation,
            request,
        }
    }

    /// Shows the last result computed for the current mode while the new
    /// load runs.
    fn swap_to_retained(&mut self) {
        let retained = match self.selection.mode {
            Mode::SingleYear => self.last_single.clone().map(|snapshot| {
                let range = YearRange::single(snapshot.selected_year);
                (ViewSnapshot::Single(snapshot), range)
            }),
            Mode::Range => self.last_aggregated.clone().map(|aggregated| {
                let range = aggregated.range();
                (ViewSnapshot::Aggregated(aggregated), range)
            }),
        };
        if let Some((snapshot, range)) = retained {
            self.resolved_range = Some(range);
            self.active = Some(snapshot);
        }
    }

    fn install_single(&mut self, loaded: LoadedYears) -> Result<()> {
        let snapshot = loaded
            .snapshots
            .into_iter()
            .next()
            .ok_or(Error::NoAvailableYears(self.domain))?;
        self.resolved_range = Some(loaded.range);
        self.last_single = Some(Arc::clone(&snapshot));
        self.active = Some(ViewSnapshot::Single(snapshot));
        Ok(())
    }

    fn install_aggregated(&mut self, loaded: LoadedYears) -> Result<()> {
        let aggregated = match aggregate_range(&loaded.snapshots, &self.policy) {
            Err(Error::NoSnapshots) => Err(Error::EmptyRange {
                from: loaded.range.from,
                to: loaded.range.to,
            }),
            other => other,
        }?;
        self.resolved_range = Some(loaded.range);
        self.last_aggregated = Some(aggregated.clone());
        self.active = Some(ViewSnapshot::Aggregated(aggregated));
        Ok(())
    }

    fn fail(&mut self, error: Error) -> ApplyStatus {
        warn!("Failed to load {} view: {}", self.domain, error);
        self.state = ViewState::Error;
        self.last_error = Some(error);
        ApplyStatus::Failed
    }
}
