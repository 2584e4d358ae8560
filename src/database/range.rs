use crate::spreadsheet::reference::cell_reference;
use std::fmt::Display;
use std::fmt::Formatter;
use std::slice::Iter;
use thiserror::Error;

/// Errors related to range addressing.
#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("Range rows must be strictly ascending, found row {next} after row {previous}")]
    Unordered { previous: usize, next: usize },
}

/// A rectangular region of a sheet, 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RangeAddress {
    pub row: usize,
    pub column: usize,
    pub num_rows: usize,
    pub num_columns: usize,
}

impl RangeAddress {
    pub fn new(row: usize, column: usize, num_rows: usize, num_columns: usize) -> Self {
        Self {
            row,
            column,
            num_rows,
            num_columns,
        }
    }

    /// A single full-width row starting at column 1.
    pub fn row(row: usize, width: usize) -> Self {
        Self::new(row, 1, 1, width)
    }

    /// Last row covered by this region (inclusive).
    pub fn last_row(&self) -> usize {
        self.row + self.num_rows.max(1) - 1
    }

    /// Last column covered by this region (inclusive).
    pub fn last_column(&self) -> usize {
        self.column + self.num_columns.max(1) - 1
    }
}

impl Display for RangeAddress {
    /// Renders A1 notation: `C7` for a single cell, `A3:C3` otherwise.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let first = cell_reference(self.row, self.column);
        if self.num_rows <= 1 && self.num_columns <= 1 {
            write!(f, "{}", first)
        } else {
            write!(f, "{}:{}", first, cell_reference(self.last_row(), self.last_column()))
        }
    }
}

/// Ordered row addresses matched by a query, in table scan order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeSet {
    addresses: Vec<RangeAddress>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, RangeAddress> {
        self.addresses.iter()
    }

    /// Row numbers in set order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.addresses.iter().map(|address| address.row)
    }

    pub(crate) fn clear(&mut self) {
        self.addresses.clear();
    }

    /// Row numbers to delete one after another so that every addressed row goes away.
    ///
    /// Each deletion shifts the rows below it up by one, so the k-th deletion
    /// (0-indexed) targets `row_k - k`. Rows must be strictly ascending.
    pub fn deletion_targets(&self) -> Result<Vec<usize>, RangeError> {
        for pair in self.addresses.windows(2) {
            if pair[1].row <= pair[0].row {
                return Err(RangeError::Unordered {
                    previous: pair[0].row,
                    next: pair[1].row,
                });
            }
        }
        Ok(self
            .rows()
            .enumerate()
            .map(|(index, row)| row - index)
            .collect())
    }
}

impl FromIterator<RangeAddress> for RangeSet {
    fn from_iter<I: IntoIterator<Item = RangeAddress>>(iter: I) -> Self {
        Self {
            addresses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a RangeAddress;
    type IntoIter = Iter<'a, RangeAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_set(rows: &[usize]) -> RangeSet {
        rows.iter().map(|row| RangeAddress::row(*row, 3)).collect()
    }

    #[test]
    fn deletion_targets_compensate_for_shift() {
        assert_eq!(range_set(&[3, 5, 7]).deletion_targets(), Ok(vec![3, 4, 5]));
        assert_eq!(range_set(&[2, 3, 4]).deletion_targets(), Ok(vec![2, 2, 2]));
        assert_eq!(range_set(&[]).deletion_targets(), Ok(vec![]));
    }

    #[test]
    fn deletion_targets_reject_unordered_rows() {
        assert_eq!(
            range_set(&[5, 3]).deletion_targets(),
            Err(RangeError::Unordered { previous: 5, next: 3 })
        );
        assert_eq!(
            range_set(&[4, 4]).deletion_targets(),
            Err(RangeError::Unordered { previous: 4, next: 4 })
        );
    }

    #[test]
    fn a1_notation() {
        assert_eq!(RangeAddress::row(3, 3).to_string(), "A3:C3");
        assert_eq!(RangeAddress::new(7, 3, 1, 1).to_string(), "C7");
        assert_eq!(RangeAddress::new(2, 1, 4, 28).to_string(), "A2:AB5");
    }
}
