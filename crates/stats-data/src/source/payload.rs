//! Decoding of raw statistics service responses.

use crate::errors::StatsError;
use crate::models::YearSnapshot;

/// Turns a raw service response into a snapshot.
///
/// Transports call this with the status code and body they received, so every
/// source reports failures the same way: non-success statuses become
/// [`StatsError::UpstreamApplication`], unparseable bodies become
/// [`StatsError::InvalidPayload`].
pub fn decode_snapshot(status: u16, body: &str) -> Result<YearSnapshot, StatsError> {
    if !(200..300).contains(&status) {
        return Err(StatsError::from_response(status, body));
    }

    let snapshot: YearSnapshot = serde_json::from_str(body)
        .map_err(|e| StatsError::InvalidPayload(format!("Failed to parse snapshot: {}", e)))?;

    if snapshot.available_years.is_empty() {
        return Err(StatsError::InvalidPayload(format!(
            "{} snapshot {} lists no available years",
            snapshot.domain, snapshot.selected_year
        )));
    }

    Ok(snapshot.normalized())
}
