//! Product repository for the relational catalog.

use sqlx::PgPool;

use toiletpro_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, ProductDraft};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, image, badge, stock
            FROM products
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, image, badge, stock
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Case-insensitive substring search over name, description and category.
    ///
    /// `%` and `_` in `term` match literally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(term));

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, image, badge, stock
            FROM products
            WHERE name ILIKE $1 ESCAPE '\'
               OR description ILIKE $1 ESCAPE '\'
               OR category ILIKE $1 ESCAPE '\'
            ORDER BY id DESC
            ",
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Insert a product and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, draft: &ProductDraft) -> Result<ProductId, RepositoryError> {
        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO products (name, description, price, category, image, badge, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.category)
        .bind(&draft.image)
        .bind(&draft.badge)
        .bind(draft.stock)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Delete every product. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("toilet"), "toilet");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("dual_flush"), "dual\\_flush");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
