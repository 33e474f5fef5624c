//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use toiletpro_core::{Email, UserId};

/// A registered storefront customer.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name given at registration.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
