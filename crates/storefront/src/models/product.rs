//! Catalog product types.

use serde::{Deserialize, Serialize};

use toiletpro_core::{Price, ProductId};

/// Category assigned when the admin form leaves it blank.
pub const DEFAULT_CATEGORY: &str = "Toilet";

/// A catalog product.
///
/// The same shape is read from the relational `products` table (public
/// browsing, search, cart) and from `products.json` (admin console).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub stock: i32,
}

impl Product {
    /// Whether a badge such as "New" or "Sale" should be shown.
    #[must_use]
    pub fn has_badge(&self) -> bool {
        !self.badge.trim().is_empty()
    }

    /// Value of the units in stock at the listed price, or `None` if the
    /// product carries a price too large to multiply.
    #[must_use]
    pub fn inventory_value(&self) -> Option<Price> {
        self.price.checked_mul(i64::from(self.stock.max(0)))
    }
}

/// Product fields submitted through the admin console, before an ID is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub badge: String,
    pub stock: i32,
}

impl ProductDraft {
    /// Whether the required fields are present: a name, a description and a
    /// positive price.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && self.price.is_positive()
    }

    /// Whether the price fits the catalog's price column.
    #[must_use]
    pub fn price_in_range(&self) -> bool {
        self.price.is_storable()
    }

    /// Attach an ID, producing a catalog product.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            badge: self.badge,
            stock: self.stock,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Smart Toilet X1".to_string(),
            description: "Heated seat, bidet and night light".to_string(),
            price: Price::from_cents(129_999),
            category: DEFAULT_CATEGORY.to_string(),
            image: String::new(),
            badge: String::new(),
            stock: 4,
        }
    }

    #[test]
    fn test_draft_completeness() {
        assert!(draft().is_complete());

        let mut missing_name = draft();
        missing_name.name = "   ".to_string();
        assert!(!missing_name.is_complete());

        let mut missing_description = draft();
        missing_description.description = String::new();
        assert!(!missing_description.is_complete());

        let mut free = draft();
        free.price = Price::ZERO;
        assert!(!free.is_complete());
    }

    #[test]
    fn test_inventory_value_ignores_negative_stock() {
        let product = draft().into_product(ProductId::new(1));
        assert_eq!(product.inventory_value(), Some(Price::from_cents(519_996)));

        let oversold = ProductDraft {
            stock: -3,
            ..draft()
        }
        .into_product(ProductId::new(2));
        assert_eq!(oversold.inventory_value(), Some(Price::ZERO));
    }

    #[test]
    fn test_price_range() {
        assert!(draft().price_in_range());
        assert!(ProductDraft { price: Price::MAX, ..draft() }.price_in_range());

        let over = ProductDraft {
            price: Price::from_dollars(100_000_000),
            ..draft()
        };
        assert!(over.is_complete());
        assert!(!over.price_in_range());
    }

    #[test]
    fn test_inventory_value_overflow_is_none() {
        let product = ProductDraft {
            price: Price::new(rust_decimal::Decimal::MAX),
            stock: 2_000_000_000,
            ..draft()
        }
        .into_product(ProductId::new(1));
        assert_eq!(product.inventory_value(), None);
    }

    #[test]
    fn test_json_defaults_for_optional_fields() {
        let json = r#"{"id":3,"name":"Seat","description":"Soft close","price":45.5,"category":"Seat"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 0);
        assert!(!product.has_badge());
        assert_eq!(product.price, Price::from_cents(4550));
    }
}
