//! Coupon Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{coupons::CouponRule, fixtures::FixtureError, recency::SeenCoupon};

/// Wrapper for coupon rules in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Rules in the order they were extracted
    pub coupons: Vec<CouponFixture>,

    /// When codes were last seen
    #[serde(default)]
    pub seen: Vec<SeenCoupon>,
}

/// A number as it may appear in extracted data: integer, float or text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Integer literal
    Int(i64),

    /// Float literal
    Float(f64),

    /// Anything else
    Text(String),
}

impl RawAmount {
    /// The amount as an exact decimal, if it is a number.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawAmount::Int(value) => Some(Decimal::from(*value)),
            RawAmount::Float(value) => value.to_string().parse().ok(),
            RawAmount::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Coupon code
    pub code: String,

    /// Flat amount off
    #[serde(default)]
    pub discount_value: Option<RawAmount>,

    /// Percentage off (0-100)
    #[serde(default)]
    pub discount_percentage: Option<RawAmount>,

    /// Cap on a percentage discount
    #[serde(default)]
    pub max_discount: Option<RawAmount>,

    /// Minimum cart subtotal
    #[serde(default)]
    pub minimum_purchase: Option<RawAmount>,

    /// Product category restriction
    #[serde(default)]
    pub product_type_limit: Option<String>,

    /// Whether the terms are known
    #[serde(default = "terms_known")]
    pub has_rules: bool,
}

fn terms_known() -> bool {
    true
}

impl TryFrom<CouponFixture> for CouponRule {
    type Error = FixtureError;

    fn try_from(fixture: CouponFixture) -> Result<Self, Self::Error> {
        let code = fixture.code;

        let amount = |raw: Option<RawAmount>, field: &'static str| match raw {
            None => Ok(None),
            Some(raw) => raw
                .to_decimal()
                .map(Some)
                .ok_or_else(|| FixtureError::InvalidAmount {
                    code: code.clone(),
                    field,
                }),
        };

        Ok(CouponRule {
            discount_value: amount(fixture.discount_value, "discount value")?,
            discount_percentage: amount(fixture.discount_percentage, "discount percentage")?,
            max_discount: amount(fixture.max_discount, "max discount")?,
            minimum_purchase: amount(fixture.minimum_purchase, "minimum purchase")?,
            product_type_limit: fixture.product_type_limit,
            has_rules: fixture.has_rules,
            code,
        })
    }
}
