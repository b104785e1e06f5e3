use std::sync::Arc;

use fiscalboard_stats_data::keys::{expenditure, revenue, trade};
use fiscalboard_stats_data::{
    Breakdown, CategoryEntry, DetailEntry, Domain, SnapshotFigures, YearSnapshot,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate_range;
use crate::aggregation::aggregation_policy::{AggregationPolicy, DerivedShare};
use crate::aggregation::shares::shares_balanced;
use crate::errors::{Error, ErrorKind};

// =========================================================================
// Fixtures
// =========================================================================

fn available() -> Vec<i32> {
    (2010..=2022).collect()
}

fn entry(id: &str, amount: Decimal) -> CategoryEntry {
    CategoryEntry::new(id, id.to_uppercase(), amount, Decimal::ZERO)
}

fn detail(label: &str, amount: Decimal) -> DetailEntry {
    DetailEntry {
        label: label.to_string(),
        amount,
        share_of_category_pct: Decimal::ZERO,
    }
}

fn snapshot(domain: Domain, year: i32, figures: SnapshotFigures) -> YearSnapshot {
    YearSnapshot::new(domain, year, available(), figures)
}

/// Revenue snapshot with two sources, X and Y, plus a ratio and a YoY change.
fn revenue_year(
    year: i32,
    x: Decimal,
    y: Decimal,
    pct_gdp: Option<Decimal>,
    change: Option<Decimal>,
) -> YearSnapshot {
    let mut figures = SnapshotFigures::default();
    figures
        .totals
        .insert(revenue::TOTAL_REVENUE.to_string(), x + y);
    figures
        .ratios
        .insert(revenue::REVENUE_PCT_GDP.to_string(), pct_gdp);
    figures
        .changes
        .insert(revenue::REVENUE_CHANGE_YOY_PCT.to_string(), change);
    figures.breakdowns.push(Breakdown::new(
        revenue::SOURCES,
        vec![entry("x", x), entry("y", y)],
    ));
    snapshot(Domain::RevenueSources, year, figures)
}

fn three_years() -> Vec<YearSnapshot> {
    vec![
        revenue_year(2018, dec!(100), dec!(200), Some(dec!(10)), Some(dec!(1.5))),
        revenue_year(2019, dec!(120), dec!(230), None, Some(dec!(16.67))),
        revenue_year(2020, dec!(80), dec!(270), Some(dec!(13)), Some(dec!(0))),
    ]
}

fn policy() -> AggregationPolicy {
    AggregationPolicy::default()
}

// =========================================================================
// Sums and shares
// =========================================================================

#[test]
fn test_category_amount_and_share_over_three_years() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();
    let sources = aggregated.figures.breakdown(revenue::SOURCES).unwrap();

    let x = sources.entry("x").unwrap();
    assert_eq!(x.amount, dec!(300));
    assert_eq!(x.share_pct, dec!(30.00));

    let y = sources.entry("y").unwrap();
    assert_eq!(y.amount, dec!(700));
    assert_eq!(y.share_pct, dec!(70.00));

    // Largest first
    assert_eq!(sources.entries[0].id, "y");
    assert!(shares_balanced(sources));
}

#[test]
fn test_totals_are_exact_sums_not_averages() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();
    assert_eq!(
        aggregated.figures.total(revenue::TOTAL_REVENUE),
        Some(dec!(1000))
    );
}

#[test]
fn test_totals_reported_only_in_some_years_still_sum() {
    let mut years = three_years();
    years[1]
        .figures
        .totals
        .insert(revenue::TAX_REVENUE.to_string(), dec!(42.5));

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert_eq!(aggregated.figures.total(revenue::TAX_REVENUE), Some(dec!(42.5)));
}

#[test]
fn test_zero_total_group_has_zero_shares() {
    let years = vec![
        revenue_year(2018, Decimal::ZERO, Decimal::ZERO, None, None),
        revenue_year(2019, Decimal::ZERO, Decimal::ZERO, None, None),
    ];
    let aggregated = aggregate_range(&years, &policy()).unwrap();
    let sources = aggregated.figures.breakdown(revenue::SOURCES).unwrap();
    assert!(sources.entries.iter().all(|e| e.share_pct.is_zero()));
}

#[test]
fn test_equal_siblings_shares_sum_to_exactly_hundred() {
    let partners: Vec<CategoryEntry> = (0..31)
        .map(|i| entry(&format!("p{:02}", i), dec!(1)))
        .collect();
    let mut figures = SnapshotFigures::default();
    figures
        .totals
        .insert(trade::EXPORTS_TOTAL.to_string(), dec!(31));
    figures
        .breakdowns
        .push(Breakdown::new(trade::EXPORT_PARTNERS, partners));
    let years = vec![snapshot(Domain::Trade, 2020, figures)];

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    let group = aggregated.figures.breakdown(trade::EXPORT_PARTNERS).unwrap();

    let sum: Decimal = group.entries.iter().map(|e| e.share_pct).sum();
    assert_eq!(sum, dec!(100));
    assert!(shares_balanced(group));

    // 100 / 31 = 3.2258..., the 18 leftover hundredths go to the lowest ids
    assert_eq!(group.entry("p00").unwrap().share_pct, dec!(3.23));
    assert_eq!(group.entry("p17").unwrap().share_pct, dec!(3.23));
    assert_eq!(group.entry("p18").unwrap().share_pct, dec!(3.22));
    assert_eq!(group.entry("p30").unwrap().share_pct, dec!(3.22));
}

#[test]
fn test_entries_missing_in_some_years_are_kept_with_end_year_label() {
    let mut years = three_years();
    years[0].figures.breakdowns[0]
        .entries
        .push(CategoryEntry::new("z", "Old name", dec!(50), dec!(0)));
    years[2].figures.breakdowns[0]
        .entries
        .push(CategoryEntry::new("z", "New name", dec!(50), dec!(0)));

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    let sources = aggregated.figures.breakdown(revenue::SOURCES).unwrap();
    let z = sources.entry("z").unwrap();

    assert_eq!(z.amount, dec!(100));
    assert_eq!(z.label, "New name");
    assert_eq!(z.share_pct, dec!(9.09));
    assert!(shares_balanced(sources));
}

// =========================================================================
// Ratios and year-over-year changes
// =========================================================================

#[test]
fn test_ratios_average_over_reported_years_only() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();
    // (10 + 13) / 2, the null year is skipped
    assert_eq!(
        aggregated.figures.ratio(revenue::REVENUE_PCT_GDP),
        Some(dec!(11.50))
    );
}

#[test]
fn test_all_null_ratio_stays_null() {
    let years = vec![
        revenue_year(2018, dec!(1), dec!(1), None, None),
        revenue_year(2019, dec!(1), dec!(1), None, None),
    ];
    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert!(aggregated
        .figures
        .ratios
        .contains_key(revenue::REVENUE_PCT_GDP));
    assert_eq!(aggregated.figures.ratio(revenue::REVENUE_PCT_GDP), None);
}

#[test]
fn test_ratio_average_rounds_to_two_places() {
    let years = vec![
        revenue_year(2018, dec!(1), dec!(1), Some(dec!(1)), None),
        revenue_year(2019, dec!(1), dec!(1), Some(dec!(1)), None),
        revenue_year(2020, dec!(1), dec!(1), Some(dec!(2)), None),
    ];
    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert_eq!(
        aggregated.figures.ratio(revenue::REVENUE_PCT_GDP),
        Some(dec!(1.33))
    );
}

#[test]
fn test_yoy_changes_come_from_end_year() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();
    assert_eq!(
        aggregated.figures.change(revenue::REVENUE_CHANGE_YOY_PCT),
        Some(dec!(0))
    );

    let years = three_years();
    let aggregated = aggregate_range(&years[..2], &policy()).unwrap();
    assert_eq!(
        aggregated.figures.change(revenue::REVENUE_CHANGE_YOY_PCT),
        Some(dec!(16.67))
    );
}

#[test]
fn test_yoy_anchor_ignores_input_order() {
    let mut years = three_years();
    years.reverse();
    let aggregated = aggregate_range(&years, &policy()).unwrap();

    assert_eq!(aggregated.selected_year, 2020);
    assert_eq!(aggregated.figures.changes, years[0].figures.changes);
}

// =========================================================================
// Range bounds and shape
// =========================================================================

#[test]
fn test_bounds_reflect_range_not_dataset() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();

    assert_eq!(aggregated.selected_year, 2020);
    assert_eq!(aggregated.since_year, 2018);
    assert_eq!(aggregated.to_year, 2020);
    assert_eq!(aggregated.covered_years, vec![2018, 2019, 2020]);
    assert_eq!(aggregated.available_years, available());
    assert_eq!(aggregated.domain, Domain::RevenueSources);
}

#[test]
fn test_empty_input_is_a_no_op() {
    let empty: Vec<YearSnapshot> = Vec::new();
    assert_eq!(
        aggregate_range(&empty, &policy()).unwrap_err(),
        Error::NoSnapshots
    );
}

#[test]
fn test_duplicate_years_are_merged_once() {
    let mut years = three_years();
    years.push(years[0].clone());

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert_eq!(aggregated.covered_years, vec![2018, 2019, 2020]);
    assert_eq!(
        aggregated.figures.total(revenue::TOTAL_REVENUE),
        Some(dec!(1000))
    );
}

#[test]
fn test_other_domains_are_ignored() {
    let mut years = three_years();
    let mut foreign = SnapshotFigures::default();
    foreign
        .totals
        .insert(revenue::TOTAL_REVENUE.to_string(), dec!(999));
    years.push(snapshot(Domain::Trade, 2017, foreign));

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert_eq!(aggregated.since_year, 2018);
    assert_eq!(
        aggregated.figures.total(revenue::TOTAL_REVENUE),
        Some(dec!(1000))
    );
}

#[test]
fn test_foreign_snapshot_for_same_year_does_not_shadow_domain() {
    // Same years as the revenue input, sorted ahead of it and ending later
    let foreign = |year: i32| {
        let mut figures = SnapshotFigures::default();
        figures
            .totals
            .insert(revenue::TOTAL_REVENUE.to_string(), dec!(999));
        snapshot(Domain::Trade, year, figures)
    };
    let mut years = vec![foreign(2018), foreign(2021)];
    years.extend(three_years());

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    assert_eq!(aggregated.domain, Domain::RevenueSources);
    assert_eq!(aggregated.covered_years, vec![2018, 2019, 2020]);
    assert_eq!(aggregated.to_year, 2020);
    assert_eq!(
        aggregated.figures.total(revenue::TOTAL_REVENUE),
        Some(dec!(1000))
    );
}

#[test]
fn test_overflowing_totals_fail_as_invalid_data() {
    let years = vec![
        revenue_year(2019, Decimal::MAX, dec!(0), None, None),
        revenue_year(2020, Decimal::MAX, dec!(0), None, None),
    ];

    let error = aggregate_range(&years, &policy()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidData);
    assert!(error.to_string().contains("does not fit in a decimal"));
}

#[test]
fn test_accepts_shared_snapshots_and_is_idempotent() {
    let shared: Vec<Arc<YearSnapshot>> = three_years().into_iter().map(Arc::new).collect();
    let first = aggregate_range(&shared, &policy()).unwrap();
    let second = aggregate_range(&shared, &policy()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_multiple_groups_keep_first_seen_order() {
    let build = |year: i32, exports: Decimal, imports: Decimal| {
        let mut figures = SnapshotFigures::default();
        figures
            .totals
            .insert(trade::EXPORTS_TOTAL.to_string(), exports);
        figures
            .totals
            .insert(trade::IMPORTS_TOTAL.to_string(), imports);
        figures.breakdowns.push(Breakdown::new(
            trade::EXPORT_PARTNERS,
            vec![entry("cn", exports)],
        ));
        figures.breakdowns.push(Breakdown::new(
            trade::IMPORT_PARTNERS,
            vec![entry("us", imports)],
        ));
        snapshot(Domain::Trade, year, figures)
    };
    let years = vec![build(2019, dec!(5), dec!(7)), build(2020, dec!(6), dec!(8))];

    let aggregated = aggregate_range(&years, &policy()).unwrap();
    let keys: Vec<&str> = aggregated
        .figures
        .breakdowns
        .iter()
        .map(|b| b.key.as_str())
        .collect();
    assert_eq!(keys, vec![trade::EXPORT_PARTNERS, trade::IMPORT_PARTNERS]);

    let cn = aggregated
        .figures
        .breakdown(trade::EXPORT_PARTNERS)
        .unwrap()
        .entry("cn")
        .unwrap();
    assert_eq!(cn.amount, dec!(11));
    assert_eq!(cn.share_pct, dec!(100.00));
}

// =========================================================================
// Details
// =========================================================================

#[test]
fn test_category_details_are_rolled_up_and_truncated() {
    let division = |year: i32, details: Vec<DetailEntry>| {
        let amount: Decimal = details.iter().map(|d| d.amount).sum();
        let mut figures = SnapshotFigures::default();
        figures.breakdowns.push(Breakdown::new(
            expenditure::VOTE_DIVISIONS,
            vec![entry("health", amount).with_details(details)],
        ));
        snapshot(Domain::Expenditure, year, figures)
    };

    // 12 distinct programmes across two years, "P01" appears in both
    let first: Vec<DetailEntry> = (1..=6)
        .map(|i| detail(&format!("P{:02}", i), Decimal::from(i)))
        .collect();
    let mut second: Vec<DetailEntry> = (7..=12)
        .map(|i| detail(&format!("P{:02}", i), Decimal::from(i)))
        .collect();
    second.push(detail("P01", dec!(20)));

    let years = vec![division(2019, first), division(2020, second)];
    let aggregated = aggregate_range(&years, &policy()).unwrap();
    let health = aggregated
        .figures
        .breakdown(expenditure::VOTE_DIVISIONS)
        .unwrap()
        .entry("health")
        .unwrap();

    // 1..=12 sums to 78, plus the extra 20 on P01
    assert_eq!(health.amount, dec!(98));
    assert_eq!(health.details.len(), 8);
    assert_eq!(health.details[0].label, "P01");
    assert_eq!(health.details[0].amount, dec!(21));
    assert_eq!(health.details[0].share_of_category_pct, dec!(21.43));
    assert!(health
        .details
        .windows(2)
        .all(|pair| pair[0].amount >= pair[1].amount));

    let shown: Decimal = health.details.iter().map(|d| d.share_of_category_pct).sum();
    assert!(shown < dec!(100));
}

#[test]
fn test_detail_limit_comes_from_policy() {
    let details: Vec<DetailEntry> = (1..=5)
        .map(|i| detail(&format!("D{}", i), Decimal::from(i)))
        .collect();
    let mut figures = SnapshotFigures::default();
    figures.breakdowns.push(Breakdown::new(
        expenditure::VOTE_DIVISIONS,
        vec![entry("education", dec!(15)).with_details(details)],
    ));
    let years = vec![snapshot(Domain::Expenditure, 2021, figures)];

    let policy = AggregationPolicy {
        detail_limit: 3,
        ..AggregationPolicy::default()
    };
    let aggregated = aggregate_range(&years, &policy).unwrap();
    let education = &aggregated.figures.breakdowns[0].entries[0];
    assert_eq!(education.details.len(), 3);
    assert_eq!(education.details[2].label, "D3");
}

#[test]
fn test_categories_without_details_stay_without_details() {
    let aggregated = aggregate_range(&three_years(), &policy()).unwrap();
    let sources = aggregated.figures.breakdown(revenue::SOURCES).unwrap();
    assert!(sources.entries.iter().all(|e| e.details.is_empty()));
}

// =========================================================================
// Derived shares
// =========================================================================

fn expenditure_year(
    year: i32,
    total: Decimal,
    debt_service: Decimal,
    debt_stock: Decimal,
) -> YearSnapshot {
    let mut figures = SnapshotFigures::default();
    figures
        .totals
        .insert(expenditure::TOTAL_EXPENDITURE.to_string(), total);
    figures
        .totals
        .insert(expenditure::DEBT_SERVICE.to_string(), debt_service);
    figures
        .totals
        .insert(expenditure::DEBT_STOCK.to_string(), debt_stock);
    figures.ratios.insert(
        expenditure::DEBT_SERVICE_SHARE_PCT.to_string(),
        Some(dec!(99)),
    );
    snapshot(Domain::Expenditure, year, figures)
}

#[test]
fn test_derived_share_caps_flow_at_stock_per_year() {
    let years = vec![
        expenditure_year(2019, dec!(100), dec!(50), dec!(40)),
        expenditure_year(2020, dec!(100), dec!(30), dec!(100)),
    ];
    let policy = AggregationPolicy::for_domain(Domain::Expenditure);

    let aggregated = aggregate_range(&years, &policy).unwrap();

    // 40 (capped) + 30 over 200
    assert_eq!(
        aggregated.figures.ratio(expenditure::DEBT_SERVICE_SHARE_PCT),
        Some(dec!(35.00))
    );
    // The summed total itself is not capped
    assert_eq!(
        aggregated.figures.total(expenditure::DEBT_SERVICE),
        Some(dec!(80))
    );
}

#[test]
fn test_derived_share_without_cap_uses_summed_totals() {
    let years = vec![
        expenditure_year(2019, dec!(100), dec!(50), dec!(40)),
        expenditure_year(2020, dec!(100), dec!(30), dec!(100)),
    ];
    let policy = AggregationPolicy {
        derived_shares: vec![DerivedShare::new(
            expenditure::DEBT_SERVICE_SHARE_PCT,
            expenditure::DEBT_SERVICE,
            expenditure::TOTAL_EXPENDITURE,
        )],
        ..AggregationPolicy::default()
    };

    let aggregated = aggregate_range(&years, &policy).unwrap();
    assert_eq!(
        aggregated.figures.ratio(expenditure::DEBT_SERVICE_SHARE_PCT),
        Some(dec!(40.00))
    );
}

#[test]
fn test_derived_share_with_missing_numerator_keeps_average() {
    let mut with_ratio = three_years();
    for year in &mut with_ratio {
        year.figures
            .ratios
            .insert(revenue::TAX_SHARE_PCT.to_string(), Some(dec!(60)));
    }
    let policy = AggregationPolicy::for_domain(Domain::RevenueSources);

    let aggregated = aggregate_range(&with_ratio, &policy).unwrap();
    assert_eq!(
        aggregated.figures.ratio(revenue::TAX_SHARE_PCT),
        Some(dec!(60.00))
    );
}

#[test]
fn test_derived_share_with_zero_denominator_is_null() {
    let years = vec![expenditure_year(2019, Decimal::ZERO, dec!(5), dec!(5))];
    let policy = AggregationPolicy::for_domain(Domain::Expenditure);

    let aggregated = aggregate_range(&years, &policy).unwrap();
    assert_eq!(
        aggregated.figures.ratio(expenditure::DEBT_SERVICE_SHARE_PCT),
        None
    );
}
