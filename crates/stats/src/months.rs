//! Grouping of time steps by calendar month.

use crate::error::InvalidMonth;

/// Time-step indices grouped by calendar month (1..=12).
///
/// Built once from the per-step month slice that accompanies every series,
/// then used to visit each monthly stratum.
#[derive(Debug, Clone, Default)]
pub struct MonthGroups {
    groups: [Vec<usize>; 12],
}

impl MonthGroups {
    /// Groups the indices of `months` by value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonth`] for the first value outside 1..=12.
    pub fn new(months: &[u8]) -> Result<Self, InvalidMonth> {
        let mut groups: [Vec<usize>; 12] = Default::default();
        for (t, &m) in months.iter().enumerate() {
            if !(1..=12).contains(&m) {
                return Err(InvalidMonth { month: m });
            }
            groups[(m - 1) as usize].push(t);
        }
        Ok(Self { groups })
    }

    /// Returns the time-step indices for a 1-indexed calendar month.
    ///
    /// # Panics
    ///
    /// Panics if `month` is 0 or greater than 12.
    pub fn indices(&self, month: u8) -> &[usize] {
        assert!(
            (1..=12).contains(&month),
            "month must be in 1..=12, got {month}"
        );
        &self.groups[(month - 1) as usize]
    }

    /// Iterates over `(month, indices)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[usize])> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| ((i + 1) as u8, g.as_slice()))
    }

    /// Total number of grouped time steps.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Returns `true` if no time steps were grouped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
