//! Recently seen coupons
//!
//! Coupons get reposted. A rule whose code was already seen inside the window is dropped before
//! optimizing; rules without known terms always pass so they can still be surfaced.

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::coupons::CouponRule;

/// Default window within which a coupon code counts as already seen
pub const DEFAULT_WINDOW: SignedDuration = SignedDuration::from_hours(48);

/// A coupon code and when it was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeenCoupon {
    /// Coupon code
    pub code: String,

    /// When it was seen
    pub seen_at: Timestamp,
}

/// Keep the rules whose code wasn't seen within `window` of `now`.
///
/// A code seen exactly `window` ago no longer counts as recent. A sighting timestamped after
/// `now` does.
pub fn filter_unseen(
    rules: Vec<CouponRule>,
    seen: &[SeenCoupon],
    now: Timestamp,
    window: SignedDuration,
) -> Vec<CouponRule> {
    let mut latest: FxHashMap<&str, Timestamp> = FxHashMap::default();

    for entry in seen {
        latest
            .entry(entry.code.as_str())
            .and_modify(|at| *at = (*at).max(entry.seen_at))
            .or_insert(entry.seen_at);
    }

    rules
        .into_iter()
        .filter(|rule| {
            !rule.has_rules
                || latest
                    .get(rule.code.as_str())
                    .is_none_or(|&seen_at| now.duration_since(seen_at) >= window)
        })
        .collect()
}
