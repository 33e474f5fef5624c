//! Session-held shopping cart.
//!
//! Each line snapshots the product's name, price, category and image at the
//! moment it is added. Later catalog edits do not re-price existing lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use toiletpro_core::{Price, ProductId};

use super::Product;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity is below one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub quantity: i32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Shopping cart, at most one line per product, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is below one.
    pub fn add(&mut self, product: &Product, quantity: i32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                category: product.category.clone(),
                image: product.image.clone(),
                quantity,
            });
        }

        Ok(())
    }

    /// Overwrite a line's quantity. A quantity of zero or less removes the
    /// line, and succeeds whether or not the line existed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if a positive quantity is set for a
    /// product with no line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(product_id);
            return Ok(());
        }

        let line = self
            .line_mut(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.product_id != product_id);
        self.items.len() != before
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> i64 {
        self.items.iter().map(|line| i64::from(line.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}
