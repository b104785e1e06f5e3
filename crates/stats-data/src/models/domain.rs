use std::fmt;

use serde::{Deserialize, Serialize};

/// Statistical domain served by the remote statistics service.
///
/// Each dashboard view works against exactly one domain, and every snapshot
/// carries the domain it was fetched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Exports and imports by trading partner
    Trade,
    /// Sectoral composition of the economy
    EconomyStructure,
    /// Government revenue by source
    RevenueSources,
    /// Government expenditure by vote division
    Expenditure,
}

impl Domain {
    /// All domains, in display order.
    pub const ALL: [Domain; 4] = [
        Domain::Trade,
        Domain::EconomyStructure,
        Domain::RevenueSources,
        Domain::Expenditure,
    ];

    /// Stable identifier used in log lines and configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::EconomyStructure => "economy_structure",
            Self::RevenueSources => "revenue_sources",
            Self::Expenditure => "expenditure",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
