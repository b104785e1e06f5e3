//! Upstream statistics source abstraction.
//!
//! The transport behind the statistics service is owned by the host
//! application; this crate only defines the contract the engine consumes and
//! how raw responses are decoded.

mod payload;
mod traits;

pub use payload::decode_snapshot;
pub use traits::StatsSource;
