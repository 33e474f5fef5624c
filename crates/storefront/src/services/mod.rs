//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and password login
//! - `checkout` - Order totals, order numbers and order placement

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService, OrderTotals, PlacedOrder};
