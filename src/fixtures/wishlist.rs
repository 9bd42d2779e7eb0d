//! Wishlist Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::items::Item;

/// Wrapper for a wishlist in YAML
#[derive(Debug, Deserialize)]
pub struct WishlistFixture {
    /// Currency every item is priced in (e.g., "BRL")
    #[serde(default)]
    pub currency: Option<String>,

    /// Items in wishlist order
    pub items: Vec<ItemFixture>,
}

/// Item Fixture
#[derive(Debug, Deserialize)]
pub struct ItemFixture {
    /// Identifier; defaults to the item's position in the list
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Product page
    #[serde(default)]
    pub url: String,

    /// Item price (e.g., "1000.00 BRL")
    pub price: String,
}

impl ItemFixture {
    /// Build the item, given its position in the wishlist and its parsed price.
    pub fn into_item(self, position: usize, price: Decimal) -> Item {
        let identifier = self
            .id
            .unwrap_or_else(|| format!("item-{}", position + 1));

        Item::new(identifier, self.name, self.url, price)
    }
}
