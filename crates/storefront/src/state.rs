//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::store::{ForumStore, OrderArchive, ProductCatalog};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the database pool, the flat-file stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: ProductCatalog,
    orders: OrderArchive,
    forum: ForumStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The flat-file stores live under `config.data_dir`. Nothing is read
    /// from disk until the first request.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = ProductCatalog::new(&config.data_dir);
        let orders = OrderArchive::new(&config.data_dir);
        let forum = ForumStore::new(&config.data_dir);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                orders,
                forum,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Admin product catalog (`products.json`).
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.inner.catalog
    }

    /// Order audit archive (`orders.json`).
    #[must_use]
    pub fn orders(&self) -> &OrderArchive {
        &self.inner.orders
    }

    /// Forum topics (`forum_topics.json`).
    #[must_use]
    pub fn forum(&self) -> &ForumStore {
        &self.inner.forum
    }
}
