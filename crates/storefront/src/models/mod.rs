//! Domain models for storefront.
//!
//! # Models
//!
//! - `user` - Registered customers (relational `users` table)
//! - `session` - Values kept in the session (current user, preferences, admin login)
//! - `product` - Catalog products, shared by the relational catalog and `products.json`
//! - `cart` - The session-held shopping cart
//! - `order` - Orders written at checkout and their JSON audit copy
//! - `forum` - Forum topics and replies kept in `forum_topics.json`

pub mod cart;
pub mod forum;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartError, CartItem};
pub use forum::{ForumReply, ForumTopic};
pub use order::{NewOrder, OrderRecord, SHIPPING_ADDRESS};
pub use product::{Product, ProductDraft};
pub use session::{AdminSession, CurrentUser, FontSize, Preferences, Theme, keys as session_keys};
pub use user::User;
