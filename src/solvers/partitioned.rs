//! Exact multi-cart solver
//!
//! Walks every partition of the items and, within each, hands coupons to distinct carts so the
//! total saving is as large as possible. Each coupon is used at most once and each cart takes at
//! most one coupon; carts left without a coupon are bought at full price.
//!
//! A partition with more than `coupons + 1` carts can't do better than the one that merges its
//! coupon-less carts, so those partitions are skipped.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    coupons::Coupon,
    discounts::saving,
    items::groups::ItemGroup,
    solvers::{
        GroupAssignment, Solver, SolverError, SolverResult,
        partitions::Partitions,
        score::{Objective, Score},
    },
};

/// `(coupon, cart)` index pairs
type Pairs = SmallVec<[(usize, usize); 4]>;

/// Exhaustive search over partitions for the best multi-cart allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionSolver;

#[derive(Debug)]
struct Best {
    score: Score,
    groups: SmallVec<[ItemGroup; 4]>,
    table: Vec<SmallVec<[Decimal; 4]>>,
    pairs: Pairs,
}

impl Solver for PartitionSolver {
    fn solve(&self, coupons: &[Coupon], prices: &[Decimal]) -> Result<SolverResult, SolverError> {
        let mut best: Option<Best> = None;

        for partition in Partitions::new(prices.len()) {
            if partition.len() > coupons.len() + 1 {
                continue;
            }

            let groups = partition
                .into_iter()
                .map(|indices| ItemGroup::from_indices(indices, prices))
                .collect::<Result<SmallVec<[ItemGroup; 4]>, _>>()?;

            let table = saving_table(&groups, coupons)?;
            let subtotals: SmallVec<[Decimal; 4]> = groups.iter().map(ItemGroup::subtotal).collect();

            let mut search = Search::new(&table, &subtotals);
            search.visit(0, Decimal::ZERO, Decimal::ZERO)?;

            let Some((score, pairs)) = search.best else {
                continue;
            };

            if best
                .as_ref()
                .is_none_or(|current| score.beats(&current.score, Objective::Saving))
            {
                best = Some(Best {
                    score,
                    groups,
                    table,
                    pairs,
                });
            }
        }

        let assignments = best.map_or_else(SmallVec::new, |best| {
            best.pairs
                .iter()
                .filter_map(|&(coupon_idx, group_idx)| {
                    let group = best.groups.get(group_idx)?.clone();
                    let saving = *best.table.get(coupon_idx)?.get(group_idx)?;

                    Some(GroupAssignment {
                        coupon_idx,
                        group,
                        saving,
                    })
                })
                .collect()
        });

        Ok(SolverResult::new(assignments, prices.len()))
    }
}

/// Saving of each coupon on each cart: `table[coupon][cart]`.
fn saving_table(
    groups: &[ItemGroup],
    coupons: &[Coupon],
) -> Result<Vec<SmallVec<[Decimal; 4]>>, SolverError> {
    coupons
        .iter()
        .map(|coupon| {
            groups
                .iter()
                .map(|group| saving(group.subtotal(), coupon).map_err(SolverError::from))
                .collect::<Result<SmallVec<[Decimal; 4]>, SolverError>>()
        })
        .collect()
}

/// Depth-first search over coupon-to-cart assignments within one partition.
struct Search<'a> {
    table: &'a [SmallVec<[Decimal; 4]>],
    subtotals: &'a [Decimal],
    used: SmallVec<[bool; 4]>,
    picks: Pairs,
    best: Option<(Score, Pairs)>,
}

impl<'a> Search<'a> {
    fn new(table: &'a [SmallVec<[Decimal; 4]>], subtotals: &'a [Decimal]) -> Self {
        Self {
            table,
            subtotals,
            used: SmallVec::from_elem(false, subtotals.len()),
            picks: SmallVec::new(),
            best: None,
        }
    }

    /// Decide coupon `coupon_idx` onwards, given the saving and subtotal assigned so far.
    fn visit(
        &mut self,
        coupon_idx: usize,
        saving: Decimal,
        subtotal: Decimal,
    ) -> Result<(), SolverError> {
        let Some(row) = self.table.get(coupon_idx) else {
            self.record(saving, subtotal);
            return Ok(());
        };

        // Coupon left unused
        self.visit(coupon_idx + 1, saving, subtotal)?;

        for (group_idx, &group_saving) in row.iter().enumerate() {
            if group_saving <= Decimal::ZERO || self.used.get(group_idx).copied().unwrap_or(true) {
                continue;
            }

            let group_subtotal = self
                .subtotals
                .get(group_idx)
                .copied()
                .unwrap_or(Decimal::ZERO);

            let next_saving = saving
                .checked_add(group_saving)
                .ok_or(SolverError::SavingOverflow)?;
            let next_subtotal = subtotal
                .checked_add(group_subtotal)
                .ok_or(SolverError::SavingOverflow)?;

            self.mark(group_idx, true);
            self.picks.push((coupon_idx, group_idx));

            self.visit(coupon_idx + 1, next_saving, next_subtotal)?;

            self.picks.pop();
            self.mark(group_idx, false);
        }

        Ok(())
    }

    fn mark(&mut self, group_idx: usize, used: bool) {
        if let Some(slot) = self.used.get_mut(group_idx) {
            *slot = used;
        }
    }

    fn record(&mut self, saving: Decimal, subtotal: Decimal) {
        if saving <= Decimal::ZERO {
            return;
        }

        let score = Score::new(saving, subtotal);

        if self
            .best
            .as_ref()
            .is_none_or(|(current, _)| score.beats(current, Objective::Saving))
        {
            self.best = Some((score, self.picks.clone()));
        }
    }
}
