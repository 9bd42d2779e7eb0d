//! Item Groups

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors related to item group construction or totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemGroupError {
    /// A group must hold at least one item.
    #[error("item group is empty")]
    Empty,

    /// An index does not refer to an item in the price list.
    #[error("Item {0} not found")]
    ItemNotFound(usize),

    /// The same item index was listed twice.
    #[error("Item {0} appears more than once in the group")]
    DuplicateItem(usize),

    /// The subtotal overflowed the decimal range.
    #[error("group subtotal overflowed")]
    SubtotalOverflow,
}

/// A candidate cart: a non-empty set of item indices and its subtotal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemGroup {
    indices: SmallVec<[usize; 10]>,
    subtotal: Decimal,
}

impl ItemGroup {
    /// Build a group from item indices, summing their prices.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemGroupError`] if the group is empty, an index is out of range or
    /// repeated, or the subtotal overflows.
    pub fn from_indices(
        indices: SmallVec<[usize; 10]>,
        prices: &[Decimal],
    ) -> Result<Self, ItemGroupError> {
        if indices.is_empty() {
            return Err(ItemGroupError::Empty);
        }

        let subtotal = indices
            .iter()
            .enumerate()
            .try_fold(Decimal::ZERO, |acc, (pos, &idx)| {
                if indices.iter().take(pos).any(|&earlier| earlier == idx) {
                    return Err(ItemGroupError::DuplicateItem(idx));
                }

                let price = prices.get(idx).ok_or(ItemGroupError::ItemNotFound(idx))?;

                acc.checked_add(*price)
                    .ok_or(ItemGroupError::SubtotalOverflow)
            })?;

        Ok(Self { indices, subtotal })
    }

    /// Item indices in the group, in insertion order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Sum of the prices of the items in the group.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Check if the group contains the given item index.
    pub fn contains(&self, idx: usize) -> bool {
        self.indices.contains(&idx)
    }

    /// Get the number of items in the group.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the group is empty. Constructed groups never are.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn prices() -> [Decimal; 3] {
        [
            Decimal::new(1000, 0),
            Decimal::new(330, 0),
            Decimal::new(1250, 2),
        ]
    }

    #[test]
    fn from_indices_sums_subtotal() -> TestResult {
        let group = ItemGroup::from_indices(smallvec![0, 2], &prices())?;

        assert_eq!(group.subtotal(), Decimal::new(101_250, 2));
        assert_eq!(group.indices(), &[0, 2]);
        assert_eq!(group.len(), 2);
        assert!(group.contains(2));
        assert!(!group.contains(1));

        Ok(())
    }

    #[test]
    fn from_indices_rejects_empty_group() {
        let result = ItemGroup::from_indices(SmallVec::new(), &prices());

        assert_eq!(result, Err(ItemGroupError::Empty));
    }

    #[test]
    fn from_indices_rejects_missing_item() {
        let result = ItemGroup::from_indices(smallvec![0, 7], &prices());

        assert_eq!(result, Err(ItemGroupError::ItemNotFound(7)));
    }

    #[test]
    fn from_indices_rejects_duplicates() {
        let result = ItemGroup::from_indices(smallvec![1, 0, 1], &prices());

        assert_eq!(result, Err(ItemGroupError::DuplicateItem(1)));
    }

    #[test]
    fn from_indices_reports_overflow() {
        let huge = [Decimal::MAX, Decimal::MAX];

        let result = ItemGroup::from_indices(smallvec![0, 1], &huge);

        assert_eq!(result, Err(ItemGroupError::SubtotalOverflow));
    }
}
