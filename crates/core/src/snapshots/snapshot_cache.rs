//! Per-domain, per-year cache of fetched snapshots.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use fiscalboard_stats_data::{Domain, YearSnapshot};
use log::{debug, warn};

/// A cached snapshot together with the time it was stored.
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<YearSnapshot>,
    pub fetched_at: DateTime<Utc>,
}

/// Cache-aside store of one domain's snapshots, keyed by year.
///
/// Owned by a single view for its lifetime. Entries are never evicted; a
/// later insert for the same year replaces the slot, so there is at most one
/// snapshot per year regardless of the order fetches complete in.
pub struct SnapshotCache {
    domain: Domain,
    entries: Mutex<BTreeMap<i32, CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// Every write replaces a whole slot, so a poisoned map is still consistent.
    fn lock_entries(&self) -> MutexGuard<'_, BTreeMap<i32, CachedSnapshot>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!(
                "Snapshot cache mutex for '{}' was poisoned, recovering",
                self.domain
            );
            poisoned.into_inner()
        })
    }

    pub fn get(&self, year: i32) -> Option<Arc<YearSnapshot>> {
        self.lock_entries()
            .get(&year)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    pub fn fetched_at(&self, year: i32) -> Option<DateTime<Utc>> {
        self.lock_entries().get(&year).map(|entry| entry.fetched_at)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lock_entries().contains_key(&year)
    }

    /// Stores a snapshot under its `selected_year`, replacing any previous one.
    pub fn insert(&self, snapshot: YearSnapshot) -> Arc<YearSnapshot> {
        let year = snapshot.selected_year;
        let snapshot = Arc::new(snapshot);
        let replaced = self.lock_entries().insert(
            year,
            CachedSnapshot {
                snapshot: Arc::clone(&snapshot),
                fetched_at: Utc::now(),
            },
        );
        if replaced.is_some() {
            debug!("Replaced cached {} snapshot for {}", self.domain, year);
        } else {
            debug!("Cached {} snapshot for {}", self.domain, year);
        }
        snapshot
    }

    /// Returns the cached snapshots for every requested year, in the order
    /// given, or `None` if any of them is missing.
    pub fn get_all(&self, years: &[i32]) -> Option<Vec<Arc<YearSnapshot>>> {
        let entries = self.lock_entries();
        years
            .iter()
            .map(|year| entries.get(year).map(|entry| Arc::clone(&entry.snapshot)))
            .collect()
    }

    /// Cached years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.lock_entries().keys().copied().collect()
    }

    /// All cached snapshots in ascending year order.
    pub fn snapshots(&self) -> Vec<Arc<YearSnapshot>> {
        self.lock_entries()
            .values()
            .map(|entry| Arc::clone(&entry.snapshot))
            .collect()
    }

    /// The most recently published year the cache knows about, taken from the
    /// `available_years` of any cached snapshot.
    pub fn latest_known_year(&self) -> Option<i32> {
        self.lock_entries()
            .values()
            .filter_map(|entry| entry.snapshot.available_years.last().copied())
            .max()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}
