//! Solvers for coupon allocation

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    coupons::Coupon,
    discounts::DiscountError,
    items::groups::{ItemGroup, ItemGroupError},
};

pub mod exact;
pub mod greedy;
pub mod partitioned;
pub mod partitions;
pub mod score;
pub mod subsets;

/// Solver Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// Wrapped item group error
    #[error(transparent)]
    ItemGroup(#[from] ItemGroupError),

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Total saving overflowed the decimal range.
    #[error("total saving overflowed")]
    SavingOverflow,
}

/// One cart with the coupon applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    /// Index of the coupon in the slice given to the solver
    pub coupon_idx: usize,

    /// Items in the cart
    pub group: ItemGroup,

    /// Amount the coupon takes off the cart
    pub saving: Decimal,
}

/// Result of allocating coupons over a price list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverResult {
    /// Carts with a coupon applied, disjoint
    pub assignments: SmallVec<[GroupAssignment; 4]>,

    /// Indexes of items not placed in any cart, ascending
    pub unassigned: SmallVec<[usize; 10]>,
}

impl SolverResult {
    /// Build a result, listing every index not covered by an assignment as unassigned.
    pub fn new(assignments: SmallVec<[GroupAssignment; 4]>, item_count: usize) -> Self {
        let unassigned = (0..item_count)
            .filter(|idx| !assignments.iter().any(|a| a.group.contains(*idx)))
            .collect();

        Self {
            assignments,
            unassigned,
        }
    }

    /// Sum of savings over all assignments.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SavingOverflow`] if the sum overflows.
    pub fn total_saving(&self) -> Result<Decimal, SolverError> {
        self.assignments
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.saving))
            .ok_or(SolverError::SavingOverflow)
    }
}

/// Trait for allocating coupons over a list of item prices
pub trait Solver {
    /// Allocate `coupons` over the items whose prices are given, by index.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if a group or saving cannot be computed.
    fn solve(&self, coupons: &[Coupon], prices: &[Decimal]) -> Result<SolverResult, SolverError>;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_lists_uncovered_items_as_unassigned() -> TestResult {
        let prices = [Decimal::ONE, Decimal::TWO, Decimal::TEN, Decimal::ONE];
        let assignment = GroupAssignment {
            coupon_idx: 0,
            group: ItemGroup::from_indices(smallvec![2, 0], &prices)?,
            saving: Decimal::ONE,
        };

        let result = SolverResult::new(smallvec![assignment], prices.len());

        assert_eq!(result.unassigned.as_slice(), &[1, 3]);
        assert_eq!(result.total_saving()?, Decimal::ONE);

        Ok(())
    }

    #[test]
    fn total_saving_reports_overflow() -> TestResult {
        let prices = [Decimal::MAX, Decimal::MAX];
        let assignments = smallvec![
            GroupAssignment {
                coupon_idx: 0,
                group: ItemGroup::from_indices(smallvec![0], &prices)?,
                saving: Decimal::MAX,
            },
            GroupAssignment {
                coupon_idx: 1,
                group: ItemGroup::from_indices(smallvec![1], &prices)?,
                saving: Decimal::MAX,
            },
        ];

        let result = SolverResult::new(assignments, prices.len());

        assert_eq!(result.total_saving(), Err(SolverError::SavingOverflow));

        Ok(())
    }
}
