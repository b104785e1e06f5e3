//! Error types for statistics source operations.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while querying the statistics service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The transport failed before a response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status and a message body.
    #[error("Statistics service error ({status}): {message}")]
    UpstreamApplication {
        /// HTTP-style status code of the response
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The service answered successfully but the payload is unusable,
    /// e.g. a snapshot for a different year than the one requested.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Error body shapes the statistics service is known to send.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error", alias = "detail")]
    message: String,
}

impl StatsError {
    /// Builds an [`StatsError::UpstreamApplication`] from a non-success response.
    ///
    /// The message is taken from a JSON `message`/`error`/`detail` field when the
    /// body has one, otherwise the trimmed body text is used as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscalboard_stats_data::errors::StatsError;
    ///
    /// let error = StatsError::from_response(404, r#"{"message":"year not published"}"#);
    /// assert_eq!(
    ///     error,
    ///     StatsError::UpstreamApplication { status: 404, message: "year not published".to_string() }
    /// );
    /// ```
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("status {}", status)
                } else {
                    trimmed.to_string()
                }
            }
        };
        Self::UpstreamApplication { status, message }
    }

    /// Whether the failure happened in transport rather than in the service.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
