//! Rolls nested category details up across the years of a range.

use std::collections::HashMap;

use fiscalboard_stats_data::DetailEntry;
use rust_decimal::Decimal;

use crate::errors::Result;

use super::shares::{overflow, percentage_of};

/// Sums detail amounts by label, keeps the `limit` largest and recomputes
/// their share of the category.
///
/// Details are matched by label, not position, so a programme that moves
/// around between years still accumulates into one line. Entries beyond the
/// limit are dropped rather than folded into an "other" line, and shares are
/// taken of the full `category_total`, so the kept shares may sum below 100.
pub fn roll_up_details<'a, I>(
    details: I,
    category_total: Decimal,
    limit: usize,
) -> Result<Vec<DetailEntry>>
where
    I: IntoIterator<Item = &'a DetailEntry>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut sums: HashMap<&'a str, Decimal> = HashMap::new();

    for detail in details {
        let label = detail.label.as_str();
        match sums.get_mut(label) {
            Some(sum) => {
                *sum = sum
                    .checked_add(detail.amount)
                    .ok_or_else(|| overflow(format!("detail '{}'", label)))?;
            }
            None => {
                order.push(label);
                sums.insert(label, detail.amount);
            }
        }
    }

    let mut rolled: Vec<DetailEntry> = order
        .into_iter()
        .map(|label| {
            let amount = sums.get(label).copied().unwrap_or(Decimal::ZERO);
            let share = percentage_of(amount, category_total)
                .ok_or_else(|| overflow(format!("share of detail '{}'", label)))?;
            Ok(DetailEntry {
                label: label.to_string(),
                amount,
                share_of_category_pct: share,
            })
        })
        .collect::<Result<_>>()?;

    // Largest first; label breaks ties so the output does not depend on input order
    rolled.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
    rolled.truncate(limit);
    Ok(rolled)
}
