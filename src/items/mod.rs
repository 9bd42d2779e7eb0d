//! Items

use rust_decimal::Decimal;
use smallvec::SmallVec;

pub mod groups;

/// A wish-listed item with an exact decimal price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    identifier: String,
    name: String,
    url: String,
    price: Decimal,
}

impl Item {
    /// Creates a new item.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            url: url.into(),
            price,
        }
    }

    /// Returns the item identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the item URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the price of the item
    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// Collects item prices, keeping input order so indices line up with `items`.
pub fn prices(items: &[Item]) -> SmallVec<[Decimal; 10]> {
    items.iter().map(Item::price).collect()
}

/// Returns the first item with a negative price, if any.
pub fn first_negative_price(items: &[Item]) -> Option<&Item> {
    items.iter().find(|item| item.price() < Decimal::ZERO)
}
