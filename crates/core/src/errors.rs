//! Core error types for the Fiscalboard aggregation engine.
//!
//! Upstream failures keep their original [`StatsError`] so the view can tell a
//! transport failure from an application error reported by the service.

use fiscalboard_stats_data::{Domain, StatsError};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the aggregation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Statistics query failed: {0}")]
    Stats(#[from] StatsError),

    #[error("No available years between {from} and {to}")]
    EmptyRange { from: i32, to: i32 },

    #[error("Domain '{0}' has no available years")]
    NoAvailableYears(Domain),

    #[error("No snapshots to aggregate")]
    NoSnapshots,

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Coarse classification used for the view's single inline error indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The statistics service could not be reached
    Network,
    /// The statistics service reported a failure
    UpstreamApplication,
    /// The service answered with an unusable payload
    InvalidData,
    /// The selection matched no available years
    EmptyRange,
    /// Configuration could not be loaded
    Configuration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Stats(StatsError::Network(_)) => ErrorKind::Network,
            Self::Stats(StatsError::UpstreamApplication { .. }) => ErrorKind::UpstreamApplication,
            Self::Stats(StatsError::InvalidPayload(_)) => ErrorKind::InvalidData,
            Self::EmptyRange { .. } | Self::NoAvailableYears(_) | Self::NoSnapshots => {
                ErrorKind::EmptyRange
            }
            Self::InvalidConfigValue(_) => ErrorKind::Configuration,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
