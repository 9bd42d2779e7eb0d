//! Exact single-cart solver
//!
//! Scores every coupon against every non-empty subset of the items and keeps the single best
//! pairing: highest percentage off, then highest absolute saving. Exponential in the number of
//! items; see [`crate::optimizer::Optimizer`] for the admission limit.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    coupons::Coupon,
    discounts::saving,
    items::groups::ItemGroup,
    solvers::{
        GroupAssignment, Solver, SolverError, SolverResult,
        score::{Objective, Score},
        subsets::Subsets,
    },
};

/// Exhaustive search for the best single coupon cart.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver;

impl Solver for ExactSolver {
    fn solve(&self, coupons: &[Coupon], prices: &[Decimal]) -> Result<SolverResult, SolverError> {
        let candidates = coupons.iter().enumerate().flat_map(|(coupon_idx, coupon)| {
            Subsets::new(prices.len()).map(move |indices| (coupon_idx, coupon, indices))
        });

        let best = best_single(candidates, prices)?;

        Ok(SolverResult::new(best.into_iter().collect(), prices.len()))
    }
}

/// Fold candidate `(coupon, indices)` pairings into the best single assignment.
///
/// Pairings below the coupon's minimum purchase, or that save nothing, never qualify.
pub(crate) fn best_single<'c>(
    mut candidates: impl Iterator<Item = (usize, &'c Coupon, SmallVec<[usize; 10]>)>,
    prices: &[Decimal],
) -> Result<Option<GroupAssignment>, SolverError> {
    candidates.try_fold(None, |best, (coupon_idx, coupon, indices)| {
        keep_better(best, coupon_idx, coupon, indices, prices)
    })
}

fn keep_better(
    best: Option<GroupAssignment>,
    coupon_idx: usize,
    coupon: &Coupon,
    indices: SmallVec<[usize; 10]>,
    prices: &[Decimal],
) -> Result<Option<GroupAssignment>, SolverError> {
    let group = ItemGroup::from_indices(indices, prices)?;

    if group.subtotal() < coupon.minimum_purchase() {
        return Ok(best);
    }

    let saving = saving(group.subtotal(), coupon)?;

    if saving <= Decimal::ZERO {
        return Ok(best);
    }

    let candidate = GroupAssignment {
        coupon_idx,
        group,
        saving,
    };

    Ok(Some(match best {
        Some(current) if !score(&candidate).beats(&score(&current), Objective::Percentage) => {
            current
        }
        _ => candidate,
    }))
}

fn score(assignment: &GroupAssignment) -> Score {
    Score::new(assignment.saving, assignment.group.subtotal())
}
