//! Share arithmetic shared by the range aggregator and the detail rollup.

use std::fmt::Display;

use fiscalboard_stats_data::{Breakdown, StatsError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{PERCENT_DECIMAL_PLACES, SHARE_SUM_TOLERANCE};
use crate::errors::{Error, Result};

/// Hundredths of a percent in a whole group.
const WHOLE_IN_BASIS_POINTS: Decimal = dec!(10000);

/// `part / whole * 100`, rounded to two decimals. Zero when `whole` is not
/// positive, `None` when the quotient does not fit in a `Decimal`.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole > Decimal::ZERO {
        part.checked_div(whole)?
            .checked_mul(dec!(100))
            .map(|pct| pct.round_dp(PERCENT_DECIMAL_PLACES))
    } else {
        Some(Decimal::ZERO)
    }
}

/// Splits 100% across `amounts` in two-decimal steps so the shares add up
/// to exactly 100.
///
/// Every share starts at its value truncated to two decimals; the missing
/// hundredths then go one each to the entries with the largest truncated
/// remainders, earlier entries first on ties. All shares are zero when the
/// total is not positive.
pub fn apportion_shares(amounts: &[Decimal]) -> Result<Vec<Decimal>> {
    let total = checked_sum(amounts.iter().copied(), "share total")?;
    if total <= Decimal::ZERO {
        return Ok(vec![Decimal::ZERO; amounts.len()]);
    }

    let mut units: Vec<Decimal> = Vec::with_capacity(amounts.len());
    let mut remainders: Vec<(usize, Decimal)> = Vec::with_capacity(amounts.len());
    for (index, amount) in amounts.iter().enumerate() {
        let exact = amount
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(WHOLE_IN_BASIS_POINTS))
            .ok_or_else(|| overflow(format!("share of {} in {}", amount, total)))?;
        let floor = exact.floor();
        units.push(floor);
        remainders.push((index, exact - floor));
    }

    let mut missing = WHOLE_IN_BASIS_POINTS - units.iter().copied().sum::<Decimal>();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (index, _) in remainders {
        if missing < Decimal::ONE {
            break;
        }
        units[index] += Decimal::ONE;
        missing -= Decimal::ONE;
    }

    Ok(units
        .into_iter()
        .map(|u| (u / dec!(100)).round_dp(PERCENT_DECIMAL_PLACES))
        .collect())
}

/// Recomputes every entry's `share_pct` from the group's current amounts.
///
/// Shares are apportioned in entry order, so sort the group first when
/// tie-breaking should follow a particular order.
pub fn recompute_shares(breakdown: &mut Breakdown) -> Result<()> {
    let amounts: Vec<Decimal> = breakdown.entries.iter().map(|e| e.amount).collect();
    let shares = apportion_shares(&amounts)?;
    for (entry, share) in breakdown.entries.iter_mut().zip(shares) {
        entry.share_pct = share;
    }
    Ok(())
}

/// Whether the group's shares add up to 100 (within tolerance), or are all
/// zero when the group has nothing to share out.
pub fn shares_balanced(breakdown: &Breakdown) -> bool {
    if breakdown.total() > Decimal::ZERO {
        let sum: Decimal = breakdown.entries.iter().map(|e| e.share_pct).sum();
        (sum - dec!(100)).abs() <= SHARE_SUM_TOLERANCE
    } else {
        breakdown.entries.iter().all(|e| e.share_pct.is_zero())
    }
}

/// Sums `values`, failing instead of panicking when the sum leaves the
/// `Decimal` range.
pub(crate) fn checked_sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value))
        .ok_or_else(|| overflow(what))
}

/// Out-of-range payload values are reported as an invalid payload.
pub(crate) fn overflow(what: impl Display) -> Error {
    StatsError::InvalidPayload(format!("{} does not fit in a decimal", what)).into()
}
