//! Greedy partition heuristic
//!
//! One pass per coupon over the remaining items, most expensive first. Each coupon claims items
//! until the cart reaches the coupon's trigger threshold, the subtotal where a capped
//! percentage stops paying off. Whatever is left forms a final cart with no coupon.
//!
//! Runs in `O(n log n)` and always yields a valid partition, but makes no optimality claim.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    coupons::Coupon,
    discounts::saving,
    items::groups::{ItemGroup, ItemGroupError},
    optimizer::AllocationMode,
    solvers::{GroupAssignment, Solver, SolverError, SolverResult, exact::best_single},
};

/// One cart produced by the greedy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedyGroup {
    /// Coupon the cart was built for; `None` for the leftover cart
    pub coupon_idx: Option<usize>,

    /// Item indices, most expensive first
    pub indices: SmallVec<[usize; 10]>,
}

/// Build one partition of the items greedily, one cart per coupon in order.
///
/// A coupon with a zero trigger threshold (flat, or an uncapped percentage) claims nothing and
/// gets no cart; its items stay available to later coupons and the leftover cart.
///
/// # Errors
///
/// Returns [`ItemGroupError::SubtotalOverflow`] if a running subtotal overflows.
pub fn greedy_partition(
    prices: &[Decimal],
    coupons: &[Coupon],
) -> Result<SmallVec<[GreedyGroup; 4]>, ItemGroupError> {
    let mut order: SmallVec<[usize; 10]> = (0..prices.len()).collect();
    order.sort_by(|&a, &b| prices.get(b).cmp(&prices.get(a)).then(a.cmp(&b)));

    let mut groups = SmallVec::new();
    let mut remaining: &[usize] = &order;

    for (coupon_idx, coupon) in coupons.iter().enumerate() {
        if remaining.is_empty() {
            break;
        }

        let take = claim_len(remaining, prices, coupon.trigger_threshold())?;

        if take == 0 {
            continue;
        }

        let (claimed, rest) = remaining.split_at_checked(take).unwrap_or((remaining, &[]));

        groups.push(GreedyGroup {
            coupon_idx: Some(coupon_idx),
            indices: claimed.iter().copied().collect(),
        });

        remaining = rest;
    }

    if !remaining.is_empty() {
        groups.push(GreedyGroup {
            coupon_idx: None,
            indices: remaining.iter().copied().collect(),
        });
    }

    Ok(groups)
}

/// How many of the (price-descending) remaining items to claim to reach `trigger`.
fn claim_len(
    remaining: &[usize],
    prices: &[Decimal],
    trigger: Decimal,
) -> Result<usize, ItemGroupError> {
    let mut total = Decimal::ZERO;
    let mut count = 0;

    for &idx in remaining {
        if total >= trigger {
            break;
        }

        let price = prices.get(idx).ok_or(ItemGroupError::ItemNotFound(idx))?;

        total = total
            .checked_add(*price)
            .ok_or(ItemGroupError::SubtotalOverflow)?;
        count += 1;
    }

    Ok(count)
}

/// Scores a greedy partition instead of enumerating.
///
/// In [`AllocationMode::Partitioned`] each cart gets the coupon it was built for. In
/// [`AllocationMode::Single`] every cart is scored against every coupon and the best single
/// pairing is kept, as the exact solver would.
#[derive(Debug, Clone, Copy)]
pub struct GreedySolver {
    mode: AllocationMode,
}

impl GreedySolver {
    /// Create a greedy solver for the given allocation mode.
    pub fn new(mode: AllocationMode) -> Self {
        Self { mode }
    }
}

impl Solver for GreedySolver {
    fn solve(&self, coupons: &[Coupon], prices: &[Decimal]) -> Result<SolverResult, SolverError> {
        let groups = greedy_partition(prices, coupons)?;

        let assignments = match self.mode {
            AllocationMode::Partitioned => per_coupon(&groups, coupons, prices)?,
            AllocationMode::Single => {
                let candidates = groups.iter().flat_map(|group| {
                    coupons.iter().enumerate().map(move |(coupon_idx, coupon)| {
                        (coupon_idx, coupon, group.indices.clone())
                    })
                });

                best_single(candidates, prices)?.into_iter().collect()
            }
        };

        Ok(SolverResult::new(assignments, prices.len()))
    }
}

fn per_coupon(
    groups: &[GreedyGroup],
    coupons: &[Coupon],
    prices: &[Decimal],
) -> Result<SmallVec<[GroupAssignment; 4]>, SolverError> {
    let mut assignments = SmallVec::new();

    for group in groups {
        let Some((coupon_idx, coupon)) = group
            .coupon_idx
            .and_then(|idx| coupons.get(idx).map(|coupon| (idx, coupon)))
        else {
            continue;
        };

        let group = ItemGroup::from_indices(group.indices.clone(), prices)?;
        let saving = saving(group.subtotal(), coupon)?;

        if saving > Decimal::ZERO {
            assignments.push(GroupAssignment {
                coupon_idx,
                group,
                saving,
            });
        }
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::coupons::CouponRule;

    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn capped(code: &str, percentage: i64, cap: i64) -> Result<Coupon, crate::coupons::CouponError> {
        Coupon::try_from(&CouponRule::percentage(code, dec(percentage)).with_max_discount(dec(cap)))
    }

    #[test]
    fn coupon_claims_items_until_trigger() -> TestResult {
        // 10% capped at 80 binds from 800: the two most expensive items reach it
        let prices = [dec(100), dec(500), dec(50), dec(400)];
        let coupons = [capped("DEZ", 10, 80)?];

        let groups = greedy_partition(&prices, &coupons)?;

        assert_eq!(
            groups.as_slice(),
            &[
                GreedyGroup {
                    coupon_idx: Some(0),
                    indices: SmallVec::from_slice(&[1, 3]),
                },
                GreedyGroup {
                    coupon_idx: None,
                    indices: SmallVec::from_slice(&[0, 2]),
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn later_coupons_take_what_is_left() -> TestResult {
        let prices = [dec(500), dec(400), dec(100), dec(50)];
        let coupons = [capped("DEZ", 10, 80)?, capped("CINCO", 10, 5)?];

        let groups = greedy_partition(&prices, &coupons)?;
        let carts: Vec<(Option<usize>, Vec<usize>)> = groups
            .iter()
            .map(|g| (g.coupon_idx, g.indices.to_vec()))
            .collect();

        assert_eq!(
            carts,
            vec![
                (Some(0), vec![0, 1]),
                (Some(1), vec![2]),
                (None, vec![3]),
            ]
        );

        Ok(())
    }

    #[test]
    fn unreachable_trigger_keeps_the_partial_cart() -> TestResult {
        let prices = [dec(100), dec(50)];
        let coupons = [capped("ALTO", 10, 1000)?, capped("OUTRO", 10, 5)?];

        let groups = greedy_partition(&prices, &coupons)?;

        // First coupon takes everything and still falls short; nothing left for the second
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups.first().map(|g| g.indices.to_vec()),
            Some(vec![0, 1])
        );

        Ok(())
    }

    #[test]
    fn zero_trigger_claims_nothing() -> TestResult {
        let prices = [dec(10), dec(30), dec(20)];
        let coupons = [Coupon::try_from(&CouponRule::flat("FLAT", dec(5)))?];

        let groups = greedy_partition(&prices, &coupons)?;

        assert_eq!(
            groups.as_slice(),
            &[GreedyGroup {
                coupon_idx: None,
                indices: SmallVec::from_slice(&[1, 2, 0]),
            }]
        );

        Ok(())
    }

    #[test]
    fn zero_trigger_leaves_items_for_later_coupons() -> TestResult {
        // 20% capped at 300 binds from 1500, reached at 1000 + 600
        let prices = [dec(1000), dec(600), dec(100)];
        let coupons = [
            Coupon::try_from(&CouponRule::flat("FLAT", dec(10)))?,
            capped("VINTE", 20, 300)?,
        ];

        let groups = greedy_partition(&prices, &coupons)?;
        let carts: Vec<(Option<usize>, Vec<usize>)> = groups
            .iter()
            .map(|g| (g.coupon_idx, g.indices.to_vec()))
            .collect();

        assert_eq!(carts, vec![(Some(1), vec![0, 1]), (None, vec![2])]);

        Ok(())
    }

    #[test]
    fn flat_coupon_first_does_not_starve_capped_coupon() -> TestResult {
        let prices = [dec(1000), dec(600), dec(100)];
        let coupons = [
            Coupon::try_from(&CouponRule::flat("FLAT", dec(10)))?,
            capped("VINTE", 20, 300)?,
        ];

        let result = GreedySolver::new(AllocationMode::Partitioned).solve(&coupons, &prices)?;
        let carts: Vec<(usize, Vec<usize>, Decimal)> = result
            .assignments
            .iter()
            .map(|a| (a.coupon_idx, a.group.indices().to_vec(), a.saving))
            .collect();

        assert_eq!(carts, vec![(1, vec![0, 1], dec(300))]);
        assert_eq!(result.unassigned.as_slice(), &[2]);

        Ok(())
    }

    #[test]
    fn equal_prices_break_ties_by_index() -> TestResult {
        let prices = [dec(10), dec(10), dec(10)];
        let coupons = [capped("VINTE", 10, 2)?];

        let groups = greedy_partition(&prices, &coupons)?;

        assert_eq!(
            groups.first().map(|g| g.indices.to_vec()),
            Some(vec![0, 1])
        );

        Ok(())
    }

    #[test]
    fn partition_is_disjoint_and_exhaustive() -> TestResult {
        let prices: Vec<Decimal> = (1..=20).map(|p| dec(p * 7 % 23 + 1)).collect();
        let coupons = [
            capped("A", 20, 30)?,
            capped("B", 15, 10)?,
            capped("C", 5, 2)?,
        ];

        let groups = greedy_partition(&prices, &coupons)?;
        let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.indices.clone()).collect();
        seen.sort_unstable();

        assert_eq!(seen, (0..20).collect::<Vec<_>>());

        Ok(())
    }

    #[test]
    fn partitioned_mode_scores_each_cart_with_its_coupon() -> TestResult {
        let prices = [dec(500), dec(400), dec(100), dec(50)];
        let coupons = [capped("DEZ", 10, 80)?, capped("CINCO", 10, 5)?];

        let result = GreedySolver::new(AllocationMode::Partitioned).solve(&coupons, &prices)?;

        let carts: Vec<(usize, Vec<usize>, Decimal)> = result
            .assignments
            .iter()
            .map(|a| (a.coupon_idx, a.group.indices().to_vec(), a.saving))
            .collect();

        assert_eq!(
            carts,
            vec![(0, vec![0, 1], dec(80)), (1, vec![2], dec(5))]
        );
        assert_eq!(result.unassigned.as_slice(), &[3]);

        Ok(())
    }

    #[test]
    fn single_mode_keeps_best_cart_across_coupons() -> TestResult {
        let prices = [dec(500), dec(400), dec(100), dec(50)];
        let coupons = [capped("DEZ", 10, 80)?, capped("CINCO", 10, 5)?];

        let result = GreedySolver::new(AllocationMode::Single).solve(&coupons, &prices)?;

        // [0, 1] with DEZ saves 80 of 900 (8.9%); [2] with DEZ saves 10 of 100 (10%)
        let best = result.assignments.first().ok_or("expected an assignment")?;

        assert_eq!(result.assignments.len(), 1);
        assert_eq!(best.coupon_idx, 0);
        assert_eq!(best.group.indices(), &[2]);
        assert_eq!(best.saving, dec(10));

        Ok(())
    }

    #[test]
    fn below_minimum_purchase_drops_the_coupon() -> TestResult {
        let prices = [dec(20), dec(10)];
        let coupons = [Coupon::try_from(
            &CouponRule::flat("MINIMO", dec(5)).with_minimum_purchase(dec(100)),
        )?];

        let result = GreedySolver::new(AllocationMode::Partitioned).solve(&coupons, &prices)?;

        assert!(result.assignments.is_empty());
        assert_eq!(result.unassigned.as_slice(), &[0, 1]);

        Ok(())
    }
}
