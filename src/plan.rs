//! Plans
//!
//! The result of one optimizer run: which items go in which cart under which coupon, and what
//! that saves.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    coupons::Coupon,
    discounts::saving_ratio,
    items::Item,
    solvers::{SolverError, SolverResult},
};

/// How the plan was searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every candidate was scored
    Exact,

    /// Greedy heuristic, no optimality guarantee
    Greedy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Exact => f.write_str("exact"),
            Strategy::Greedy => f.write_str("greedy"),
        }
    }
}

/// A coupon applied to one cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAssignment {
    /// Code of the coupon applied
    pub coupon_code: String,

    /// Indexes of the items in the cart, ascending
    pub items: SmallVec<[usize; 10]>,

    /// Identifiers of the items in the cart, in the same order as `items`
    pub item_identifiers: Vec<String>,

    /// Cart subtotal before the coupon
    pub subtotal: Decimal,

    /// Amount the coupon takes off
    pub saving: Decimal,

    /// `saving / subtotal`
    pub saving_percentage: Percentage,
}

/// The best allocation found for a wishlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    total_saving: Decimal,
    max_percentage: Percentage,
    assignments: Vec<ScoredAssignment>,
    full_price_items: SmallVec<[usize; 10]>,
    strategy: Strategy,
    excluded_coupons: usize,
}

impl Plan {
    /// A plan with no assignments: every item is bought at full price.
    pub fn empty(item_count: usize, excluded_coupons: usize) -> Self {
        Self {
            total_saving: Decimal::ZERO,
            max_percentage: Percentage::from(Decimal::ZERO),
            assignments: Vec::new(),
            full_price_items: (0..item_count).collect(),
            strategy: Strategy::Exact,
            excluded_coupons,
        }
    }

    /// Build a plan from a solver result.
    ///
    /// `items` and `coupons` must be the slices the solver's prices and coupons came from, so
    /// indexes resolve to identifiers and codes.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SavingOverflow`] if the total saving overflows.
    pub fn from_solver_result(
        result: SolverResult,
        items: &[Item],
        coupons: &[Coupon],
        strategy: Strategy,
        excluded_coupons: usize,
    ) -> Result<Self, SolverError> {
        let total_saving = result.total_saving()?;

        let assignments: Vec<ScoredAssignment> = result
            .assignments
            .into_iter()
            .map(|assignment| {
                let subtotal = assignment.group.subtotal();
                let mut indices: SmallVec<[usize; 10]> =
                    assignment.group.indices().iter().copied().collect();

                indices.sort_unstable();

                let item_identifiers = indices
                    .iter()
                    .filter_map(|&idx| items.get(idx))
                    .map(|item| item.identifier().to_string())
                    .collect();

                ScoredAssignment {
                    coupon_code: coupons
                        .get(assignment.coupon_idx)
                        .map_or_else(String::new, |coupon| coupon.code().to_string()),
                    items: indices,
                    item_identifiers,
                    subtotal,
                    saving: assignment.saving,
                    saving_percentage: Percentage::from(saving_ratio(assignment.saving, subtotal)),
                }
            })
            .collect();

        let max_ratio = assignments
            .iter()
            .map(|assignment| saving_ratio(assignment.saving, assignment.subtotal))
            .max()
            .unwrap_or(Decimal::ZERO);

        Ok(Self {
            total_saving,
            max_percentage: Percentage::from(max_ratio),
            assignments,
            full_price_items: result.unassigned,
            strategy,
            excluded_coupons,
        })
    }

    /// Sum of savings over all assignments
    pub fn total_saving(&self) -> Decimal {
        self.total_saving
    }

    /// Best percentage off among the assignments, zero when there are none
    pub fn max_percentage(&self) -> Percentage {
        self.max_percentage
    }

    /// Carts with a coupon applied
    pub fn assignments(&self) -> &[ScoredAssignment] {
        &self.assignments
    }

    /// Indexes of items not in any cart
    pub fn full_price_items(&self) -> &[usize] {
        &self.full_price_items
    }

    /// How the plan was found
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Number of coupon rules excluded as malformed
    pub fn excluded_coupons(&self) -> usize {
        self.excluded_coupons
    }

    /// Whether any coupon was applied
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
