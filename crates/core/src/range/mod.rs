//! Year range resolution against a domain's available years.

mod year_range;

pub use year_range::{resolve_year, YearRange};
