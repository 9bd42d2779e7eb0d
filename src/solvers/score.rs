//! Candidate scoring and the two-key objective

use rust_decimal::Decimal;

use crate::discounts::saving_ratio;

/// Which key decides first when comparing two candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Best percentage off, then largest absolute saving.
    Percentage,

    /// Largest absolute saving, then best percentage off.
    Saving,
}

/// Saving of a candidate and the fraction of its subtotal that saving represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Absolute saving
    pub saving: Decimal,

    /// `saving / subtotal`, zero for a non-positive subtotal
    pub ratio: Decimal,
}

impl Score {
    /// Score a saving against the subtotal it was taken from.
    pub fn new(saving: Decimal, subtotal: Decimal) -> Self {
        Self {
            saving,
            ratio: saving_ratio(saving, subtotal),
        }
    }

    /// Whether `self` strictly beats `other` under `objective`.
    ///
    /// Candidates equal on both keys don't beat each other, so the first one found is kept.
    pub fn beats(&self, other: &Self, objective: Objective) -> bool {
        let (primary, secondary) = match objective {
            Objective::Percentage => (
                self.ratio.cmp(&other.ratio),
                self.saving.cmp(&other.saving),
            ),
            Objective::Saving => (
                self.saving.cmp(&other.saving),
                self.ratio.cmp(&other.ratio),
            ),
        };

        primary.then(secondary).is_gt()
    }
}
