use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places kept on percentages and averaged ratios
pub const PERCENT_DECIMAL_PLACES: u32 = 2;

/// Number of detail lines kept per category in a range view
pub const DEFAULT_DETAIL_LIMIT: usize = 8;

/// Allowed drift of a sibling group's share sum away from 100
pub const SHARE_SUM_TOLERANCE: Decimal = dec!(0.1);
