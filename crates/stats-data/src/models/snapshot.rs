use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::Domain;

/// Detail line nested inside a category (e.g. a programme inside a vote division).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailEntry {
    pub label: String,
    pub amount: Decimal,
    /// Percentage of the owning category's amount (0-100)
    pub share_of_category_pct: Decimal,
}

/// One member of a sibling group: a category, partner, source or division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    /// Stable identity used to match the entry across years
    pub id: String,
    pub label: String,
    /// Absolute amount (currency millions for fiscal domains)
    pub amount: Decimal,
    /// Percentage of the sibling group's total (0-100)
    pub share_pct: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailEntry>,
}

impl CategoryEntry {
    /// Creates an entry without nested details.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        amount: Decimal,
        share_pct: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            amount,
            share_pct,
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<DetailEntry>) -> Self {
        self.details = details;
        self
    }
}

/// A named sibling group whose `share_pct` values are relative to each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// Group key, e.g. "export_partners" or "vote_divisions"
    pub key: String,
    pub entries: Vec<CategoryEntry>,
}

impl Breakdown {
    pub fn new(key: impl Into<String>, entries: Vec<CategoryEntry>) -> Self {
        Self {
            key: key.into(),
            entries,
        }
    }

    /// Sum of all sibling amounts.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Looks up an entry by its identity.
    pub fn entry(&self, id: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// The numeric schema shared by single-year and aggregated snapshots.
///
/// Fields are grouped by how they behave over a year range:
/// - `totals` are absolute amounts and add up across years
/// - `ratios` have no natural sum and are averaged over the years that report them
/// - `changes` are year-over-year deltas computed upstream for one year
/// - `breakdowns` are sibling groups whose shares are relative to the group total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFigures {
    #[serde(default)]
    pub totals: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub ratios: BTreeMap<String, Option<Decimal>>,
    #[serde(default)]
    pub changes: BTreeMap<String, Option<Decimal>>,
    #[serde(default)]
    pub breakdowns: Vec<Breakdown>,
}

impl SnapshotFigures {
    pub fn total(&self, key: &str) -> Option<Decimal> {
        self.totals.get(key).copied()
    }

    /// Returns the ratio value; `None` when absent or reported as unavailable.
    pub fn ratio(&self, key: &str) -> Option<Decimal> {
        self.ratios.get(key).copied().flatten()
    }

    /// Returns the year-over-year change; `None` when absent or unavailable.
    pub fn change(&self, key: &str) -> Option<Decimal> {
        self.changes.get(key).copied().flatten()
    }

    pub fn breakdown(&self, key: &str) -> Option<&Breakdown> {
        self.breakdowns.iter().find(|b| b.key == key)
    }
}

/// One domain's data for exactly one year, as returned by the statistics service.
///
/// Snapshots are immutable once cached; a newer fetch for the same year
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub domain: Domain,
    pub selected_year: i32,
    /// First year of the dataset
    pub since_year: i32,
    /// Last year of the dataset
    pub to_year: i32,
    /// Years the service has data for, sorted ascending and unique
    pub available_years: Vec<i32>,
    #[serde(flatten)]
    pub figures: SnapshotFigures,
}

impl YearSnapshot {
    /// Creates a snapshot, normalizing `available_years` to sorted unique order.
    pub fn new(
        domain: Domain,
        selected_year: i32,
        available_years: Vec<i32>,
        figures: SnapshotFigures,
    ) -> Self {
        let available_years = normalize_years(available_years);
        let since_year = available_years.first().copied().unwrap_or(selected_year);
        let to_year = available_years.last().copied().unwrap_or(selected_year);
        Self {
            domain,
            selected_year,
            since_year,
            to_year,
            available_years,
            figures,
        }
    }

    /// Re-establishes the sorted unique `available_years` invariant on a
    /// deserialized payload.
    pub fn normalized(mut self) -> Self {
        let before = self.available_years.len();
        self.available_years = normalize_years(std::mem::take(&mut self.available_years));
        if self.available_years.len() != before {
            debug!(
                "Dropped {} duplicate available years from {} snapshot {}",
                before - self.available_years.len(),
                self.domain,
                self.selected_year
            );
        }
        self
    }
}

fn normalize_years(mut years: Vec<i32>) -> Vec<i32> {
    years.sort_unstable();
    years.dedup();
    years
}
