//! Fixtures
//!
//! YAML fixture sets: `wishlists/<name>.yml` holds the items, `coupons/<name>.yml` the raw
//! coupon rules and, optionally, when codes were last seen.

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use rusty_money::iso::{BRL, Currency, EUR, GBP, USD};
use thiserror::Error;
use tracing::warn;

use crate::{
    coupons::CouponRule,
    fixtures::{coupons::CouponsFixture, wishlist::WishlistFixture},
    items::Item,
    recency::SeenCoupon,
};

pub mod coupons;
pub mod wishlist;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// A coupon amount field isn't a number
    #[error("Invalid {field} for coupon {code}")]
    InvalidAmount {
        /// Coupon code
        code: String,

        /// Name of the offending field
        field: &'static str,
    },

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No items loaded yet
    #[error("No items loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough items in fixture
    #[error("Not enough items in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of items defined in the fixture
        available: usize,
        /// Number of items requested
        requested: usize,
    },
}

/// A loaded fixture set.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    items: Vec<Item>,
    rules: Vec<CouponRule>,
    seen: Vec<SeenCoupon>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,

    skipped_items: usize,
    skipped_rules: usize,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: Vec::new(),
            rules: Vec::new(),
            seen: Vec::new(),
            currency: None,
            skipped_items: 0,
            skipped_rules: 0,
        }
    }

    /// Load wishlist items from a YAML fixture file
    ///
    /// Items whose price amount isn't a number are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a currency is unknown, or the
    /// items don't share one currency.
    pub fn load_wishlist(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("wishlists").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: WishlistFixture = serde_norway::from_str(&contents)?;

        if let Some(code) = &fixture.currency {
            self.expect_currency(currency_from_code(code)?)?;
        }

        for (position, item_fixture) in fixture.items.into_iter().enumerate() {
            let (amount, currency) = match parse_price(&item_fixture.price) {
                Ok(parsed) => parsed,
                Err(FixtureError::InvalidPrice(price)) => {
                    warn!(item = %item_fixture.name, %price, "skipping item with invalid price");
                    self.skipped_items += 1;
                    continue;
                }
                Err(error) => return Err(error),
            };

            self.expect_currency(currency)?;
            self.items.push(item_fixture.into_item(position, amount));
        }

        Ok(self)
    }

    /// Load coupon rules (and the seen history) from a YAML fixture file
    ///
    /// Rules with a non-numeric amount field are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for coupon_fixture in fixture.coupons {
            match CouponRule::try_from(coupon_fixture) {
                Ok(rule) => self.rules.push(rule),
                Err(error) => {
                    warn!(%error, "skipping coupon rule");
                    self.skipped_rules += 1;
                }
            }
        }

        self.seen.extend(fixture.seen);

        Ok(self)
    }

    /// Load a complete fixture set (wishlist and coupons with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_wishlist(name)?.load_coupons(name)?;

        Ok(fixture)
    }

    /// Get all items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The first `n` items, or all of them.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotEnoughItems`] if fewer than `n` items are loaded.
    pub fn wishlist(&self, n: Option<usize>) -> Result<&[Item], FixtureError> {
        let requested = n.unwrap_or(self.items.len());

        self.items
            .get(..requested)
            .ok_or(FixtureError::NotEnoughItems {
                available: self.items.len(),
                requested,
            })
    }

    /// Get all coupon rules
    pub fn rules(&self) -> &[CouponRule] {
        &self.rules
    }

    /// When coupon codes were last seen
    pub fn seen(&self) -> &[SeenCoupon] {
        &self.seen
    }

    /// Number of items skipped for an unparseable price
    pub fn skipped_items(&self) -> usize {
        self.skipped_items
    }

    /// Number of coupon rules skipped for a non-numeric amount
    pub fn skipped_rules(&self) -> usize {
        self.skipped_rules
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no wishlist has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn expect_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse price string (e.g., "1000.00 BRL") into an exact amount and currency
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not in the format
/// "AMOUNT CURRENCY" or the amount isn't a decimal number, and
/// [`FixtureError::UnknownCurrency`] if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, currency_from_code(currency_code)?))
}

/// Look up a supported ISO currency by code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "BRL" => Ok(BRL),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
