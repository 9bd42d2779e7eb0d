//! Coupons
//!
//! [`CouponRule`] is the loosely-shaped record produced upstream (every mechanism field
//! optional, plus a `has_rules` flag). [`Coupon`] is the normalized form the solvers score.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::discounts::Discount;

/// Reasons a coupon rule cannot be scored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The rule was extracted without any terms.
    #[error("coupon {0} has no known rules")]
    NoRules(String),

    /// Neither a discount value nor a discount percentage was given.
    #[error("coupon {0} has no discount value or percentage")]
    MissingDiscount(String),

    /// A monetary or percentage field was negative.
    #[error("coupon {code} has a negative {field}")]
    NegativeField {
        /// Coupon code
        code: String,

        /// Name of the offending field
        field: &'static str,
    },

    /// The percentage is above 100.
    #[error("coupon {code} has discount percentage {percentage} above 100")]
    PercentageOutOfRange {
        /// Coupon code
        code: String,

        /// Percentage as given (0-100 scale)
        percentage: Decimal,
    },
}

/// A coupon rule as extracted from a promotional message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouponRule {
    /// Code typed at checkout
    pub code: String,

    /// Flat amount off; wins over `discount_percentage` when both are set
    pub discount_value: Option<Decimal>,

    /// Percentage off on a 0-100 scale
    pub discount_percentage: Option<Decimal>,

    /// Cap on a percentage discount
    pub max_discount: Option<Decimal>,

    /// Minimum cart subtotal for the coupon to apply
    pub minimum_purchase: Option<Decimal>,

    /// Free-text product category restriction, informational only
    pub product_type_limit: Option<String>,

    /// Whether the terms of the coupon are known
    pub has_rules: bool,
}

impl CouponRule {
    /// A rule for a flat amount off.
    pub fn flat(code: impl Into<String>, value: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_value: Some(value),
            has_rules: true,
            ..Self::default()
        }
    }

    /// A rule for a percentage (0-100) off.
    pub fn percentage(code: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_percentage: Some(percentage),
            has_rules: true,
            ..Self::default()
        }
    }

    /// A rule whose code is known but whose terms are not.
    pub fn unknown_terms(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Set the cap on a percentage discount.
    #[must_use]
    pub fn with_max_discount(mut self, max_discount: Decimal) -> Self {
        self.max_discount = Some(max_discount);
        self
    }

    /// Set the minimum purchase.
    #[must_use]
    pub fn with_minimum_purchase(mut self, minimum_purchase: Decimal) -> Self {
        self.minimum_purchase = Some(minimum_purchase);
        self
    }

    /// Set the product type restriction.
    #[must_use]
    pub fn with_product_type_limit(mut self, limit: impl Into<String>) -> Self {
        self.product_type_limit = Some(limit.into());
        self
    }
}

/// A normalized, scoreable coupon.
#[derive(Clone, Debug, PartialEq)]
pub struct Coupon {
    code: String,
    discount: Discount,
    minimum_purchase: Decimal,
    product_type_limit: Option<String>,
}

impl Coupon {
    /// Create a new coupon.
    pub fn new(code: impl Into<String>, discount: Discount, minimum_purchase: Decimal) -> Self {
        Self {
            code: code.into(),
            discount,
            minimum_purchase,
            product_type_limit: None,
        }
    }

    /// Return the coupon code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Return the discount mechanism
    pub fn discount(&self) -> &Discount {
        &self.discount
    }

    /// Return the minimum purchase
    pub fn minimum_purchase(&self) -> Decimal {
        self.minimum_purchase
    }

    /// Return the product type restriction
    pub fn product_type_limit(&self) -> Option<&str> {
        self.product_type_limit.as_deref()
    }

    /// Subtotal at which the coupon's cap starts binding. See [`Discount::trigger_threshold`].
    pub fn trigger_threshold(&self) -> Decimal {
        self.discount.trigger_threshold()
    }
}

impl TryFrom<&CouponRule> for Coupon {
    type Error = CouponError;

    fn try_from(rule: &CouponRule) -> Result<Self, Self::Error> {
        if !rule.has_rules {
            return Err(CouponError::NoRules(rule.code.clone()));
        }

        let non_negative = |value: Option<Decimal>, field: &'static str| match value {
            Some(value) if value < Decimal::ZERO => Err(CouponError::NegativeField {
                code: rule.code.clone(),
                field,
            }),
            other => Ok(other),
        };

        let value = non_negative(rule.discount_value, "discount value")?;
        let percentage = non_negative(rule.discount_percentage, "discount percentage")?;
        let cap = non_negative(rule.max_discount, "max discount")?;
        let minimum_purchase = non_negative(rule.minimum_purchase, "minimum purchase")?;

        let discount = match (value, percentage) {
            (Some(value), _) => Discount::AmountOff(value),
            (None, Some(percentage)) if percentage > Decimal::ONE_HUNDRED => {
                return Err(CouponError::PercentageOutOfRange {
                    code: rule.code.clone(),
                    percentage,
                });
            }
            (None, Some(percentage)) => Discount::PercentageOff {
                percent: Percentage::from(percentage / Decimal::ONE_HUNDRED),
                cap,
            },
            (None, None) => return Err(CouponError::MissingDiscount(rule.code.clone())),
        };

        Ok(Coupon {
            code: rule.code.clone(),
            discount,
            minimum_purchase: minimum_purchase.unwrap_or(Decimal::ZERO),
            product_type_limit: rule.product_type_limit.clone(),
        })
    }
}

/// Coupons that can be scored, and how many usable-looking rules were rejected.
#[derive(Debug, Default)]
pub struct UsableCoupons {
    /// Normalized coupons, in input order
    pub coupons: Vec<Coupon>,

    /// Rules with `has_rules` set that failed normalization
    pub excluded: usize,
}

/// Normalize every rule with known terms, skipping malformed ones.
///
/// Rules without terms are left out silently: they are surfaced elsewhere, not scored.
pub fn usable_coupons(rules: &[CouponRule]) -> UsableCoupons {
    rules
        .iter()
        .filter(|rule| rule.has_rules)
        .fold(UsableCoupons::default(), |mut usable, rule| {
            match Coupon::try_from(rule) {
                Ok(coupon) => usable.coupons.push(coupon),
                Err(error) => {
                    tracing::warn!(code = %rule.code, %error, "excluding malformed coupon");
                    usable.excluded += 1;
                }
            }

            usable
        })
}
