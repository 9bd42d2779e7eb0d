//! Discounts
//!
//! The two coupon mechanisms and the saving calculator shared by every solver.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::coupons::Coupon;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation overflowed the decimal range.
    #[error("percentage calculation overflowed")]
    PercentOverflow,
}

/// How a coupon reduces a cart subtotal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Discount {
    /// Subtract a fixed amount from the cart (e.g. "R$ 30 off")
    AmountOff(Decimal),

    /// Take a fraction of the cart, optionally capped (e.g. "20% off up to R$ 300")
    PercentageOff {
        /// Fraction of the subtotal taken off (0.2 for 20%)
        percent: Percentage,

        /// Upper bound on the amount taken off
        cap: Option<Decimal>,
    },
}

impl Discount {
    /// Amount this mechanism takes off a qualifying subtotal.
    ///
    /// A flat discount never exceeds the subtotal, so a cart can't go negative.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentOverflow`] if the percentage calculation overflows.
    pub fn amount_off(&self, subtotal: Decimal) -> Result<Decimal, DiscountError> {
        match self {
            Discount::AmountOff(amount) => Ok((*amount).min(subtotal).max(Decimal::ZERO)),
            Discount::PercentageOff { percent, cap } => {
                let raw = percent_of(percent, subtotal)?;

                Ok(cap.map_or(raw, |cap| raw.min(cap)))
            }
        }
    }

    /// Subtotal at which a capped percentage starts hitting its cap.
    ///
    /// Zero for flat discounts, uncapped percentages and a zero percentage.
    pub fn trigger_threshold(&self) -> Decimal {
        match self {
            Discount::AmountOff(_) | Discount::PercentageOff { cap: None, .. } => Decimal::ZERO,
            Discount::PercentageOff {
                percent,
                cap: Some(cap),
            } => cap
                .checked_div(fraction(percent))
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// Exact saving of applying `coupon` to a cart worth `subtotal`.
///
/// Below the coupon's minimum purchase the coupon does not apply at all.
///
/// # Errors
///
/// Returns [`DiscountError::PercentOverflow`] if the percentage calculation overflows.
pub fn saving(subtotal: Decimal, coupon: &Coupon) -> Result<Decimal, DiscountError> {
    if subtotal < coupon.minimum_purchase() {
        return Ok(Decimal::ZERO);
    }

    coupon.discount().amount_off(subtotal)
}

/// `saving / subtotal` as a fraction, or zero for an empty or non-positive subtotal.
pub fn saving_ratio(saving: Decimal, subtotal: Decimal) -> Decimal {
    if subtotal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    saving.checked_div(subtotal).unwrap_or(Decimal::ZERO)
}

/// Calculate `percent` of an exact amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentOverflow`] if the multiplication overflows.
pub fn percent_of(percent: &Percentage, amount: Decimal) -> Result<Decimal, DiscountError> {
    fraction(percent)
        .checked_mul(amount)
        .ok_or(DiscountError::PercentOverflow)
}

/// The underlying fraction of a percentage (0.2 for 20%).
pub fn fraction(percent: &Percentage) -> Decimal {
    // decimal_percentage doesn't expose the inner Decimal
    *percent * Decimal::ONE
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::coupons::CouponRule;

    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn capped_twenty_percent() -> Result<Coupon, crate::coupons::CouponError> {
        Coupon::try_from(
            &CouponRule::percentage("VALE20", dec(20))
                .with_max_discount(dec(15))
                .with_minimum_purchase(dec(50)),
        )
    }

    #[test]
    fn percentage_saving_is_capped() -> TestResult {
        let coupon = capped_twenty_percent()?;

        assert_eq!(saving(dec(100), &coupon)?, dec(15));

        Ok(())
    }

    #[test]
    fn below_minimum_purchase_saves_nothing() -> TestResult {
        let coupon = capped_twenty_percent()?;

        assert_eq!(saving(dec(40), &coupon)?, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn minimum_purchase_is_inclusive() -> TestResult {
        let coupon = capped_twenty_percent()?;

        assert_eq!(saving(dec(50), &coupon)?, dec(10));

        Ok(())
    }

    #[test]
    fn flat_saving_never_exceeds_subtotal() -> TestResult {
        let coupon = Coupon::try_from(&CouponRule::flat("TRINTA", dec(30)))?;

        assert_eq!(saving(dec(20), &coupon)?, dec(20));
        assert_eq!(saving(dec(200), &coupon)?, dec(30));

        Ok(())
    }

    #[test]
    fn uncapped_percentage_is_exact() -> TestResult {
        let coupon = Coupon::try_from(&CouponRule::percentage("DEZ", dec(10)))?;

        // 10% of 0.33 is 0.033, no rounding to cents
        assert_eq!(saving(Decimal::new(33, 2), &coupon)?, Decimal::new(33, 3));

        Ok(())
    }

    #[test]
    fn trigger_threshold_for_capped_percentage() {
        let discount = Discount::PercentageOff {
            percent: Percentage::from(Decimal::new(2, 1)),
            cap: Some(dec(300)),
        };

        assert_eq!(discount.trigger_threshold(), dec(1500));
    }

    #[test]
    fn trigger_threshold_is_zero_without_cap() {
        let uncapped = Discount::PercentageOff {
            percent: Percentage::from(Decimal::new(2, 1)),
            cap: None,
        };
        let flat = Discount::AmountOff(dec(30));
        let zero_percent = Discount::PercentageOff {
            percent: Percentage::from(Decimal::ZERO),
            cap: Some(dec(30)),
        };

        assert_eq!(uncapped.trigger_threshold(), Decimal::ZERO);
        assert_eq!(flat.trigger_threshold(), Decimal::ZERO);
        assert_eq!(zero_percent.trigger_threshold(), Decimal::ZERO);
    }

    #[test]
    fn saving_ratio_guards_non_positive_subtotal() {
        assert_eq!(saving_ratio(dec(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(saving_ratio(dec(10), dec(-5)), Decimal::ZERO);
        assert_eq!(saving_ratio(dec(266), dec(1330)), Decimal::new(2, 1));
    }

    #[test]
    fn percent_of_overflow_returns_error() {
        let percent = Percentage::from(dec(2));

        assert_eq!(
            percent_of(&percent, Decimal::MAX),
            Err(DiscountError::PercentOverflow)
        );
    }
}
