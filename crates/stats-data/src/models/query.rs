use serde::{Deserialize, Serialize};

/// Parameters of one snapshot query against the statistics service.
///
/// Omitting `year` asks the service for its latest year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl SnapshotQuery {
    /// Query for the latest year the service has.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Query for one specific year.
    pub fn for_year(year: i32) -> Self {
        Self {
            since_year: None,
            year: Some(year),
        }
    }

    pub fn since(mut self, since_year: i32) -> Self {
        self.since_year = Some(since_year);
        self
    }
}
