//! Partition enumeration
//!
//! Every way of splitting `{0..n-1}` into disjoint, non-empty groups whose union is the whole
//! set. Element `i` either joins one of the groups opened by elements `0..i` or opens a new
//! group, so each partition is described by one label per element where a label is at most one
//! more than every label before it (a restricted growth string). Walking those strings in
//! order visits every partition exactly once with `O(n)` state and no recursion.
//!
//! The count grows as the Bell numbers (1, 1, 2, 5, 15, 52, 203, ...), faster than subsets.

use smallvec::{SmallVec, smallvec};

/// A partition: groups of item indices, ordered by their smallest index.
pub type Partition = SmallVec<[SmallVec<[usize; 10]>; 4]>;

/// Lazily yields every partition of `{0..n-1}` exactly once.
#[derive(Debug, Clone)]
pub struct Partitions {
    labels: SmallVec<[usize; 10]>,
    exhausted: bool,
}

impl Partitions {
    /// Enumerate the partitions of `n` item indices.
    ///
    /// The empty set has exactly one partition, with no groups.
    pub fn new(n: usize) -> Self {
        Self {
            labels: smallvec![0; n],
            exhausted: false,
        }
    }

    fn advance(&mut self) {
        // Rightmost element that can move to a later group without breaking the growth rule
        let pivot = (1..self.labels.len()).rev().find(|&pos| {
            let prefix_max = self.labels.iter().take(pos).copied().max().unwrap_or(0);

            self.labels.get(pos).is_some_and(|&label| label <= prefix_max)
        });

        let Some(pos) = pivot else {
            self.exhausted = true;
            return;
        };

        for (offset, label) in self.labels.iter_mut().skip(pos).enumerate() {
            if offset == 0 {
                *label += 1;
            } else {
                *label = 0;
            }
        }
    }

    fn current(&self) -> Partition {
        let mut groups: Partition = SmallVec::new();

        for (idx, &label) in self.labels.iter().enumerate() {
            match groups.get_mut(label) {
                Some(group) => group.push(idx),
                None => groups.push(smallvec![idx]),
            }
        }

        groups
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let partition = self.current();
        self.advance();

        Some(partition)
    }
}

/// The `n`th Bell number, saturating at `u128::MAX`.
pub fn bell_number(n: usize) -> u128 {
    // Bell triangle: each row starts with the last entry of the previous row
    let mut row: Vec<u128> = vec![1];

    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        let mut acc = row.last().copied().unwrap_or(1);
        next.push(acc);

        for &above in &row {
            acc = acc.saturating_add(above);
            next.push(acc);
        }

        row = next;
    }

    row.first().copied().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn canonical(partition: &Partition) -> BTreeSet<BTreeSet<usize>> {
        partition
            .iter()
            .map(|group| group.iter().copied().collect())
            .collect()
    }

    fn assert_covers_exactly_once(partition: &Partition, n: usize) {
        let mut seen: Vec<usize> = partition.iter().flatten().copied().collect();
        seen.sort_unstable();

        assert_eq!(seen, (0..n).collect::<Vec<_>>(), "partition {partition:?}");
        assert!(
            partition.iter().all(|group| !group.is_empty()),
            "empty group in {partition:?}"
        );
    }

    #[test]
    fn three_items_have_five_partitions() {
        let partitions: Vec<Vec<Vec<usize>>> = Partitions::new(3)
            .map(|p| p.iter().map(|group| group.to_vec()).collect())
            .collect();

        assert_eq!(
            partitions,
            vec![
                vec![vec![0, 1, 2]],
                vec![vec![0, 1], vec![2]],
                vec![vec![0, 2], vec![1]],
                vec![vec![0], vec![1, 2]],
                vec![vec![0], vec![1], vec![2]],
            ]
        );
    }

    #[test]
    fn four_items_have_fifteen_distinct_covering_partitions() {
        let partitions: Vec<Partition> = Partitions::new(4).collect();
        let distinct: BTreeSet<_> = partitions.iter().map(canonical).collect();

        assert_eq!(partitions.len(), 15);
        assert_eq!(distinct.len(), 15);

        for partition in &partitions {
            assert_covers_exactly_once(partition, 4);
        }
    }

    #[test]
    fn counts_follow_bell_numbers() {
        for n in 0..=8 {
            let expected = usize::try_from(bell_number(n)).unwrap_or(usize::MAX);

            assert_eq!(Partitions::new(n).count(), expected, "n = {n}");
        }
    }

    #[test]
    fn empty_set_has_one_empty_partition() {
        let partitions: Vec<Partition> = Partitions::new(0).collect();

        assert_eq!(partitions.len(), 1);
        assert!(partitions.first().is_some_and(SmallVec::is_empty));
    }

    #[test]
    fn bell_numbers() {
        let bells: Vec<u128> = (0..=7).map(bell_number).collect();

        assert_eq!(bells, vec![1, 1, 2, 5, 15, 52, 203, 877]);
    }

    #[test]
    fn bell_number_saturates() {
        assert_eq!(bell_number(200), u128::MAX);
    }
}
