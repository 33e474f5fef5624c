//! Order placement.
//!
//! The order header and lines go to Postgres in one transaction. After the
//! commit an audit copy is appended to `orders.json`; a failure there is
//! logged and does not fail the checkout.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use toiletpro_core::{OrderStatus, Price};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Cart, CurrentUser, NewOrder, OrderRecord, SHIPPING_ADDRESS};
use crate::store::OrderArchive;

/// Subtotal at which shipping becomes free.
const FREE_SHIPPING_THRESHOLD: i64 = 100;

/// Flat shipping charge below the threshold.
const FLAT_SHIPPING: i64 = 15;

/// Sales tax rate, applied to the subtotal before shipping.
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Attempts at inserting an order before giving up on order number collisions.
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order could not be written; the transaction was rolled back.
    #[error("failed to save order: {0}")]
    Repository(#[from] RepositoryError),
}

/// Money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Compute shipping, tax and total for a subtotal.
    #[must_use]
    pub fn compute(subtotal: Price) -> Self {
        let shipping = if subtotal >= Price::from_dollars(FREE_SHIPPING_THRESHOLD) {
            Price::ZERO
        } else {
            Price::from_dollars(FLAT_SHIPPING)
        };
        let tax = subtotal.scale(TAX_RATE).round_cents();

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Totals for the current contents of a cart.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::compute(cart.subtotal())
    }
}

/// A committed order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_number: String,
    pub totals: OrderTotals,
}

/// Generate a human-readable order number: `TP`, the UTC timestamp to the
/// second, and three random digits.
#[must_use]
pub fn generate_order_number() -> String {
    let suffix: u16 = rand::rng().random_range(100..=999);
    format!("TP{}{suffix}", Utc::now().format("%Y%m%d%H%M%S"))
}

/// Checkout service.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
    archive: &'a OrderArchive,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, archive: &'a OrderArchive) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            archive,
        }
    }

    /// Place an order for everything in `cart`.
    ///
    /// The caller clears the cart once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::Repository` if the order could not be committed.
    pub async fn place_order(
        &self,
        user: &CurrentUser,
        cart: &Cart,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = OrderTotals::for_cart(cart);
        let mut order = NewOrder {
            order_number: generate_order_number(),
            user_id: user.id,
            items: cart.items().to_vec(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            tax: totals.tax,
            total: totals.total,
            status: OrderStatus::Pending,
            shipping_address: SHIPPING_ADDRESS.to_string(),
        };

        let mut attempt = 1;
        let id = loop {
            match self.orders.create(&order).await {
                Ok(id) => break id,
                Err(RepositoryError::Conflict(_)) if attempt < MAX_ORDER_NUMBER_ATTEMPTS => {
                    tracing::warn!(order_number = %order.order_number, "Order number collision, retrying");
                    order.order_number = generate_order_number();
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            order_id = %id,
            order_number = %order.order_number,
            user_id = %user.id,
            total = %order.total,
            "Order placed"
        );

        let record = OrderRecord {
            order_number: order.order_number.clone(),
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            items: order.items,
            subtotal: order.subtotal,
            shipping: order.shipping,
            tax: order.tax,
            total: order.total,
            status: order.status,
            order_date: Utc::now(),
            shipping_address: order.shipping_address,
        };
        if let Err(e) = self.archive.append(record).await {
            tracing::warn!(order_number = %order.order_number, error = %e, "Failed to archive order");
        }

        Ok(PlacedOrder {
            order_number: order.order_number,
            totals,
        })
    }
}
