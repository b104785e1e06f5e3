use std::collections::BTreeMap;
use std::path::Path;

use fiscalboard_stats_data::Domain;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationPolicy;
use crate::errors::{Error, Result};

/// Overrides the detail limit of every domain.
pub const DETAIL_LIMIT_ENV: &str = "FISCALBOARD_DETAIL_LIMIT";

/// Path of a JSON file with per-domain policy overrides.
pub const POLICY_FILE_ENV: &str = "FISCALBOARD_POLICY_FILE";

/// Aggregation policies for every domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub policies: BTreeMap<Domain, AggregationPolicy>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            policies: Domain::ALL
                .iter()
                .map(|domain| (*domain, AggregationPolicy::for_domain(*domain)))
                .collect(),
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration from the environment (and a `.env` file, if any).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from the built-in defaults, a policy file and
    /// environment overrides, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(POLICY_FILE_ENV) {
            config.merge_file(Path::new(path.trim()))?;
        }

        if let Some(raw) = lookup(DETAIL_LIMIT_ENV) {
            let limit: usize = raw.trim().parse().map_err(|_| {
                Error::InvalidConfigValue(format!(
                    "{} must be a number, got '{}'",
                    DETAIL_LIMIT_ENV, raw
                ))
            })?;
            if limit == 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be at least 1",
                    DETAIL_LIMIT_ENV
                )));
            }
            debug!("Using detail limit {} for all domains", limit);
            for policy in config.policies.values_mut() {
                policy.detail_limit = limit;
            }
        }

        Ok(config)
    }

    /// Replaces the policies named in `json`; other domains keep theirs.
    /// Nothing is replaced when any of the named policies is invalid.
    ///
    /// The JSON is an object keyed by domain, e.g.
    /// `{"expenditure": {"detailLimit": 10, "derivedShares": []}}`.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let overrides: BTreeMap<Domain, AggregationPolicy> = serde_json::from_str(json)?;
        if let Some(domain) = overrides
            .iter()
            .find(|(_, policy)| policy.detail_limit == 0)
            .map(|(domain, _)| domain)
        {
            return Err(Error::InvalidConfigValue(format!(
                "detailLimit for {} must be at least 1",
                domain
            )));
        }

        for (domain, policy) in overrides {
            info!("Applying aggregation policy override for {}", domain);
            self.policies.insert(domain, policy);
        }
        Ok(())
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfigValue(format!(
                "Cannot read policy file {}: {}",
                path.display(),
                e
            ))
        })?;
        self.merge_json(&json)
    }

    /// The policy for a domain, falling back to the built-in one.
    pub fn policy(&self, domain: Domain) -> AggregationPolicy {
        self.policies
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| AggregationPolicy::for_domain(domain))
    }
}
