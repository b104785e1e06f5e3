//! Per-domain rules for turning several years into one range result.

use fiscalboard_stats_data::keys::{expenditure, revenue};
use fiscalboard_stats_data::Domain;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DETAIL_LIMIT;

/// A ratio that is recomputed from summed totals instead of being averaged.
///
/// `output = numerator / denominator * 100`. With `cap_against` set, each
/// year's numerator is first capped at that year's value of the named stock
/// total, so a flow can never exceed the stock it is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedShare {
    /// Ratio key written into the aggregated figures
    pub output: String,
    /// Total key of the flow being expressed as a share
    pub numerator: String,
    /// Total key of the base the share is taken of
    pub denominator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_against: Option<String>,
}

impl DerivedShare {
    pub fn new(
        output: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
            cap_against: None,
        }
    }

    pub fn capped_against(mut self, stock: impl Into<String>) -> Self {
        self.cap_against = Some(stock.into());
        self
    }
}

/// Aggregation rules for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationPolicy {
    /// Maximum detail lines kept per category
    pub detail_limit: usize,
    pub derived_shares: Vec<DerivedShare>,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            detail_limit: DEFAULT_DETAIL_LIMIT,
            derived_shares: Vec::new(),
        }
    }
}

impl AggregationPolicy {
    /// Built-in policy for a domain.
    ///
    /// Only expenditure caps a flow against a stock: debt service is capped
    /// at the outstanding debt stock before its share of spending is taken.
    pub fn for_domain(domain: Domain) -> Self {
        let derived_shares = match domain {
            Domain::Trade | Domain::EconomyStructure => Vec::new(),
            Domain::RevenueSources => vec![DerivedShare::new(
                revenue::TAX_SHARE_PCT,
                revenue::TAX_REVENUE,
                revenue::TOTAL_REVENUE,
            )],
            Domain::Expenditure => vec![DerivedShare::new(
                expenditure::DEBT_SERVICE_SHARE_PCT,
                expenditure::DEBT_SERVICE,
                expenditure::TOTAL_EXPENDITURE,
            )
            .capped_against(expenditure::DEBT_STOCK)],
        };
        Self {
            derived_shares,
            ..Self::default()
        }
    }
}
