//! Admin product catalog kept in `products.json`.

use std::collections::HashSet;
use std::path::Path;

use toiletpro_core::{Price, ProductId};

use super::{JsonFile, StoreError};
use crate::models::{Product, ProductDraft};

/// File name of the admin catalog inside the data directory.
pub const FILE_NAME: &str = "products.json";

/// Dashboard statistics for the admin console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub product_count: usize,
    /// Sum of price times stock over all products.
    pub inventory_value: Price,
    pub category_count: usize,
}

impl CatalogStats {
    /// Compute statistics over `products`. Returns `None` if the inventory
    /// value leaves the decimal range.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Option<Self> {
        let categories: HashSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
        let inventory_value = products.iter().try_fold(Price::ZERO, |total, product| {
            total.checked_add(product.inventory_value()?)
        })?;

        Some(Self {
            product_count: products.len(),
            inventory_value,
            category_count: categories.len(),
        })
    }
}

/// CRUD over `products.json`.
pub struct ProductCatalog {
    file: JsonFile<Product>,
}

impl ProductCatalog {
    /// Open the catalog inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join(FILE_NAME)),
        }
    }

    /// All products in file order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.file.load().await
    }

    /// Add a product with ID `max(existing) + 1`, or 1 for an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdsExhausted` if the largest ID is `i32::MAX`,
    /// leaving the file untouched, and `StoreError` if the file cannot be
    /// read, parsed or written.
    pub async fn add(&self, draft: ProductDraft) -> Result<ProductId, StoreError> {
        let added = self
            .file
            .update(|products| {
                let id = match products.iter().map(|p| p.id).max() {
                    Some(max) => max.next()?,
                    None => ProductId::new(1),
                };
                products.push(draft.into_product(id));
                Some(id)
            })
            .await?;

        added.ok_or_else(|| StoreError::IdsExhausted {
            path: self.file.path().to_path_buf(),
        })
    }

    /// Replace the fields of the product with `id`. Returns `false` when no
    /// such product exists, in which case the file is not rewritten.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or written.
    pub async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<bool, StoreError> {
        let updated = self
            .file
            .update(|products| {
                let product = products.iter_mut().find(|p| p.id == id)?;
                *product = draft.into_product(id);
                Some(())
            })
            .await?;

        Ok(updated.is_some())
    }

    /// Remove the product with `id`. Returns `false` when no such product
    /// exists, in which case the file is not rewritten.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or written.
    pub async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let deleted = self
            .file
            .update(|products| {
                let index = products.iter().position(|p| p.id == id)?;
                products.remove(index);
                Some(())
            })
            .await?;

        Ok(deleted.is_some())
    }

    /// Dashboard statistics over the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed, or if the
    /// inventory value overflows.
    pub async fn stats(&self) -> Result<CatalogStats, StoreError> {
        Ok(self.dashboard().await?.1)
    }

    /// All products together with their statistics, from a single read.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed, or if the
    /// inventory value overflows.
    pub async fn dashboard(&self) -> Result<(Vec<Product>, CatalogStats), StoreError> {
        let products = self.list().await?;
        let stats = CatalogStats::from_products(&products).ok_or_else(|| {
            StoreError::AmountOverflow {
                path: self.file.path().to_path_buf(),
            }
        })?;
        Ok((products, stats))
    }
}
