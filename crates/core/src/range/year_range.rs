use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// An inclusive span of years, always ordered `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    /// Normalizes a requested interval against the available years.
    ///
    /// The bounds are reordered when given backwards and clamped into
    /// `[min(available), max(available)]`. Returns `None` when no years are
    /// available, in which case callers keep whatever they displayed before.
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscalboard_core::range::YearRange;
    ///
    /// let available: Vec<i32> = (2010..=2022).collect();
    /// let range = YearRange::resolve(2005, 2012, &available).unwrap();
    /// assert_eq!(range, YearRange { from: 2010, to: 2012 });
    ///
    /// assert_eq!(YearRange::resolve(2012, 2005, &[]), None);
    /// ```
    pub fn resolve(from: i32, to: i32, available_years: &[i32]) -> Option<Self> {
        let min = available_years.iter().copied().min()?;
        let max = available_years.iter().copied().max()?;
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        Some(Self {
            from: low.clamp(min, max),
            to: high.clamp(min, max),
        })
    }

    pub fn single(year: i32) -> Self {
        Self {
            from: year,
            to: year,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    pub fn is_single_year(&self) -> bool {
        self.from == self.to
    }

    /// The available years that fall inside this range, ascending.
    ///
    /// Fails with [`Error::EmptyRange`] when the range lands in a gap of the
    /// dataset and matches no available year.
    pub fn covered_years(&self, available_years: &[i32]) -> Result<Vec<i32>> {
        let mut years: Vec<i32> = available_years
            .iter()
            .copied()
            .filter(|y| self.contains(*y))
            .collect();
        years.sort_unstable();
        years.dedup();

        if years.is_empty() {
            return Err(Error::EmptyRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(years)
    }
}

/// Resolves a single requested year to an available one.
///
/// Out-of-bounds years are clamped to the nearest bound; a year falling in a
/// gap resolves to the closest available year, preferring the later one on
/// ties. Returns `None` when no years are available.
pub fn resolve_year(year: i32, available_years: &[i32]) -> Option<i32> {
    available_years
        .iter()
        .copied()
        .min_by_key(|candidate| ((candidate - year).abs(), -candidate))
}
