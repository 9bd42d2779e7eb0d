//! Subset enumeration
//!
//! Every non-empty subset of `{0..n-1}`, smallest subsets first and lexicographic within a
//! size: `[0] [1] [2] [0,1] [0,2] [1,2] [0,1,2]`. There are `2^n - 1` of them, so callers keep
//! `n` small.

use smallvec::{SmallVec, smallvec};

/// Lazily yields every non-empty subset of `{0..n-1}` exactly once.
#[derive(Debug, Clone)]
pub struct Subsets {
    n: usize,
    current: SmallVec<[usize; 10]>,
    exhausted: bool,
}

impl Subsets {
    /// Enumerate the subsets of `n` item indices.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            current: smallvec![0],
            exhausted: n == 0,
        }
    }

    /// Step to the next combination of the same size, or the first one of the next size.
    fn advance(&mut self) {
        let size = self.current.len();
        let n = self.n;

        // Rightmost position whose index can still move right: idx < n - size + pos
        let pivot = (0..size)
            .rev()
            .find(|&pos| self.current.get(pos).is_some_and(|&idx| idx + size < n + pos));

        match pivot {
            Some(pos) => {
                let Some(start) = self.current.get(pos).map(|idx| idx + 1) else {
                    return;
                };

                for (offset, slot) in self.current.iter_mut().skip(pos).enumerate() {
                    *slot = start + offset;
                }
            }
            None if size < n => self.current = (0..=size).collect(),
            None => self.exhausted = true,
        }
    }
}

impl Iterator for Subsets {
    type Item = SmallVec<[usize; 10]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let subset = self.current.clone();
        self.advance();

        Some(subset)
    }
}

/// Number of non-empty subsets of `n` items, saturating at `u128::MAX`.
pub fn subset_count(n: usize) -> u128 {
    u32::try_from(n)
        .ok()
        .and_then(|n| 1_u128.checked_shl(n))
        .map_or(u128::MAX, |count| count - 1)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn collect(n: usize) -> Vec<Vec<usize>> {
        Subsets::new(n).map(|subset| subset.to_vec()).collect()
    }

    #[test]
    fn empty_set_has_no_non_empty_subsets() {
        assert!(collect(0).is_empty());
    }

    #[test]
    fn three_items_in_size_then_lexicographic_order() {
        assert_eq!(
            collect(3),
            vec![
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );
    }

    #[test]
    fn four_items_match_the_power_set() {
        let generated: Vec<BTreeSet<usize>> = Subsets::new(4)
            .map(|subset| subset.into_iter().collect())
            .collect();

        let distinct: BTreeSet<BTreeSet<usize>> = generated.iter().cloned().collect();

        let power_set: BTreeSet<BTreeSet<usize>> = (1_u32..16)
            .map(|mask| (0..4).filter(|bit| mask & (1 << bit) != 0).collect())
            .collect();

        assert_eq!(generated.len(), 15);
        assert_eq!(distinct, power_set);
    }

    #[test]
    fn counts_follow_two_to_the_n_minus_one() {
        for n in 0..=10 {
            let expected = usize::try_from(subset_count(n)).unwrap_or(usize::MAX);

            assert_eq!(Subsets::new(n).count(), expected, "n = {n}");
        }
    }

    #[test]
    fn subset_count_saturates() {
        assert_eq!(subset_count(4), 15);
        assert_eq!(subset_count(127), u128::MAX >> 1);
        assert_eq!(subset_count(128), u128::MAX);
        assert_eq!(subset_count(usize::MAX), u128::MAX);
    }
}
