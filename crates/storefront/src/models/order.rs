//! Order types written at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toiletpro_core::{Email, OrderStatus, Price, UserId};

use super::CartItem;

/// Shipping address recorded on every order. Checkout does not collect one.
pub const SHIPPING_ADDRESS: &str = "123 Main St, Anytown, USA";

/// An order ready to be inserted into the relational store.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: String,
}

/// Audit copy of an order appended to `orders.json` after the database commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: Email,
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub shipping_address: String,
}
