//! Merges the per-year snapshots of a range into one aggregated snapshot.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

use fiscalboard_stats_data::{
    Breakdown, CategoryEntry, DetailEntry, Domain, SnapshotFigures, YearSnapshot,
};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::constants::PERCENT_DECIMAL_PLACES;
use crate::errors::{Error, Result};

use super::aggregation_model::AggregatedSnapshot;
use super::aggregation_policy::{AggregationPolicy, DerivedShare};
use super::detail_rollup::roll_up_details;
use super::shares::{apportion_shares, checked_sum, overflow, percentage_of};

/// Aggregates the snapshots of every year in a resolved range.
///
/// - Totals and category/partner amounts are summed exactly.
/// - Ratios are averaged over the years that report them (null when none
///   do), unless the policy recomputes them from summed totals.
/// - Shares are recomputed from the summed amounts, never averaged, and
///   apportioned so each sibling group adds up to exactly 100.
/// - Year-over-year changes are copied from the end year unchanged.
/// - Nested details are rolled up per category by label.
///
/// The result belongs to the domain most of the input is for; snapshots of
/// other domains are dropped before years are matched up. Input order does
/// not matter and duplicate years are merged once.
///
/// Fails with [`Error::NoSnapshots`] for an empty input, in which case
/// callers keep their previous result, and with an invalid payload error
/// when the figures do not fit in a `Decimal`.
pub fn aggregate_range<S>(
    snapshots: &[S],
    policy: &AggregationPolicy,
) -> Result<AggregatedSnapshot>
where
    S: Borrow<YearSnapshot>,
{
    let all: Vec<&YearSnapshot> = snapshots.iter().map(|s| s.borrow()).collect();
    let domain = majority_domain(&all).ok_or(Error::NoSnapshots)?;

    let mut years: Vec<&YearSnapshot> = all.into_iter().filter(|s| s.domain == domain).collect();
    if years.len() != snapshots.len() {
        warn!(
            "Ignored {} snapshots from other domains while aggregating {}",
            snapshots.len() - years.len(),
            domain
        );
    }
    years.sort_by_key(|s| s.selected_year);
    years.dedup_by_key(|s| s.selected_year);

    let end = *years.last().ok_or(Error::NoSnapshots)?;
    let covered_years: Vec<i32> = years.iter().map(|s| s.selected_year).collect();
    let since_year = covered_years.first().copied().unwrap_or(end.selected_year);

    let totals = sum_totals(&years)?;
    let mut ratios = average_ratios(&years)?;
    for derived in &policy.derived_shares {
        if let Some(value) = derive_share(&years, &totals, derived)? {
            ratios.insert(derived.output.clone(), value);
        }
    }
    let breakdowns = merge_breakdowns(&years, policy.detail_limit)?;

    info!(
        "Aggregated {} snapshots for {} ({}-{})",
        covered_years.len(),
        domain,
        since_year,
        end.selected_year
    );

    Ok(AggregatedSnapshot {
        domain,
        selected_year: end.selected_year,
        since_year,
        to_year: end.selected_year,
        available_years: end.available_years.clone(),
        covered_years,
        figures: SnapshotFigures {
            totals,
            ratios,
            changes: end.figures.changes.clone(),
            breakdowns,
        },
    })
}

/// The domain with the most snapshots; ties go to the later `Domain`.
fn majority_domain(snapshots: &[&YearSnapshot]) -> Option<Domain> {
    let mut counts: BTreeMap<Domain, usize> = BTreeMap::new();
    for snapshot in snapshots {
        *counts.entry(snapshot.domain).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(domain, _)| domain)
}

fn sum_totals(years: &[&YearSnapshot]) -> Result<BTreeMap<String, Decimal>> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for snapshot in years {
        for (key, value) in &snapshot.figures.totals {
            let sum = totals.entry(key.clone()).or_insert(Decimal::ZERO);
            *sum = sum
                .checked_add(*value)
                .ok_or_else(|| overflow(format!("total '{}'", key)))?;
        }
    }
    Ok(totals)
}

fn average_ratios(years: &[&YearSnapshot]) -> Result<BTreeMap<String, Option<Decimal>>> {
    let mut reported: BTreeMap<&str, (Decimal, u32)> = BTreeMap::new();
    let mut keys: Vec<&str> = Vec::new();

    for snapshot in years {
        for (key, value) in &snapshot.figures.ratios {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
            if let Some(value) = value {
                let slot = reported.entry(key.as_str()).or_insert((Decimal::ZERO, 0));
                slot.0 = slot
                    .0
                    .checked_add(*value)
                    .ok_or_else(|| overflow(format!("ratio '{}'", key)))?;
                slot.1 += 1;
            }
        }
    }

    Ok(keys
        .into_iter()
        .map(|key| {
            let average = reported.get(key).map(|(sum, count)| {
                (*sum / Decimal::from(*count)).round_dp(PERCENT_DECIMAL_PLACES)
            });
            (key.to_string(), average)
        })
        .collect())
}

/// Recomputes a derived ratio from summed totals, applying its stock cap
/// year by year. Returns `None` when the numerator is not reported at all,
/// leaving the averaged value in place.
fn derive_share(
    years: &[&YearSnapshot],
    totals: &BTreeMap<String, Decimal>,
    derived: &DerivedShare,
) -> Result<Option<Option<Decimal>>> {
    let Some(summed) = totals.get(&derived.numerator).copied() else {
        return Ok(None);
    };

    let numerator = match &derived.cap_against {
        Some(stock_key) => checked_sum(
            years.iter().filter_map(|snapshot| {
                let flow = snapshot.figures.total(&derived.numerator)?;
                match snapshot.figures.total(stock_key) {
                    Some(stock) if flow > stock => {
                        debug!(
                            "Capping {} at {} for {} {} ({} > {})",
                            derived.numerator,
                            stock_key,
                            snapshot.domain,
                            snapshot.selected_year,
                            flow,
                            stock
                        );
                        Some(stock)
                    }
                    _ => Some(flow),
                }
            }),
            &derived.numerator,
        )?,
        None => summed,
    };

    let value = match totals.get(&derived.denominator) {
        Some(denominator) if *denominator > Decimal::ZERO => Some(
            percentage_of(numerator, *denominator)
                .ok_or_else(|| overflow(format!("share '{}'", derived.output)))?,
        ),
        _ => None,
    };
    Ok(Some(value))
}

struct EntryAccumulator<'a> {
    id: &'a str,
    label: &'a str,
    amount: Decimal,
    details: Vec<&'a DetailEntry>,
}

struct GroupAccumulator<'a> {
    key: &'a str,
    entries: Vec<EntryAccumulator<'a>>,
    index: HashMap<&'a str, usize>,
}

fn merge_breakdowns(years: &[&YearSnapshot], detail_limit: usize) -> Result<Vec<Breakdown>> {
    let mut groups: Vec<GroupAccumulator<'_>> = Vec::new();

    // Years are ascending, so later labels overwrite earlier ones and the
    // end year names each entry.
    for snapshot in years.iter().copied() {
        for breakdown in &snapshot.figures.breakdowns {
            let group_pos = match groups.iter().position(|g| g.key == breakdown.key) {
                Some(pos) => pos,
                None => {
                    groups.push(GroupAccumulator {
                        key: &breakdown.key,
                        entries: Vec::new(),
                        index: HashMap::new(),
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[group_pos];

            for entry in &breakdown.entries {
                match group.index.get(entry.id.as_str()) {
                    Some(&pos) => {
                        let acc = &mut group.entries[pos];
                        acc.amount = acc.amount.checked_add(entry.amount).ok_or_else(|| {
                            overflow(format!("'{}' in '{}'", entry.id, breakdown.key))
                        })?;
                        acc.label = &entry.label;
                        acc.details.extend(entry.details.iter());
                    }
                    None => {
                        group.index.insert(&entry.id, group.entries.len());
                        group.entries.push(EntryAccumulator {
                            id: &entry.id,
                            label: &entry.label,
                            amount: entry.amount,
                            details: entry.details.iter().collect(),
                        });
                    }
                }
            }
        }
    }

    groups
        .into_iter()
        .map(|group| finish_group(group, detail_limit))
        .collect()
}

fn finish_group(group: GroupAccumulator<'_>, detail_limit: usize) -> Result<Breakdown> {
    let mut entries: Vec<CategoryEntry> = group
        .entries
        .into_iter()
        .map(|acc| {
            let details = if acc.details.is_empty() {
                Vec::new()
            } else {
                roll_up_details(acc.details, acc.amount, detail_limit)?
            };
            Ok(CategoryEntry {
                id: acc.id.to_string(),
                label: acc.label.to_string(),
                amount: acc.amount,
                share_pct: Decimal::ZERO,
                details,
            })
        })
        .collect::<Result<_>>()?;

    // Largest first; id breaks ties so the output does not depend on input
    // order, and the rounding leftovers go to the same entries every time
    entries.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));

    let amounts: Vec<Decimal> = entries.iter().map(|e| e.amount).collect();
    for (entry, share) in entries.iter_mut().zip(apportion_shares(&amounts)?) {
        entry.share_pct = share;
    }

    Ok(Breakdown::new(group.key, entries))
}
