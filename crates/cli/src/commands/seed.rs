//! Seed the relational product catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Classic Two-Piece Toilet
//!     description: Water-saving dual flush
//!     price: 299.99
//!     category: Toilet
//!     badge: Popular
//!     stock: 12
//! ```
//!
//! `image`, `badge` and `stock` are optional; `category` defaults to `Toilet`.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use toiletpro_core::Price;
use toiletpro_storefront::db::{self, ProductRepository};
use toiletpro_storefront::models::ProductDraft;
use toiletpro_storefront::models::product::DEFAULT_CATEGORY;

use super::migrate::database_url;

/// Top-level layout of a catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<SeedProduct>,
}

/// One product entry in a catalog file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub stock: i32,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl From<SeedProduct> for ProductDraft {
    fn from(p: SeedProduct) -> Self {
        Self {
            name: p.name,
            description: p.description,
            price: p.price.round_cents(),
            category: p.category,
            image: p.image,
            badge: p.badge,
            stock: p.stock,
        }
    }
}

/// Parse a catalog file and return the drafts, or the list of problems.
///
/// # Errors
///
/// Returns the YAML error or one message per incomplete product.
pub fn parse_catalog(content: &str) -> Result<Vec<ProductDraft>, Box<dyn std::error::Error>> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    let drafts: Vec<ProductDraft> = catalog.products.into_iter().map(Into::into).collect();

    let errors: Vec<String> = drafts
        .iter()
        .enumerate()
        .filter_map(|(i, d)| {
            let problem = if !d.is_complete() {
                "needs a name, description and positive price".to_string()
            } else if !d.price_in_range() {
                format!("price exceeds {}", Price::MAX)
            } else {
                return None;
            };
            Some(format!("product #{} ({:?}): {problem}", i + 1, d.name))
        })
        .collect();

    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    Ok(drafts)
}

/// Seed products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog
/// * `clear_existing` - If true, delete all existing products first
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or validated, or database operations fail.
pub async fn products(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let drafts = parse_catalog(&content)?;
    info!(products = drafts.len(), "Catalog validated");

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = ProductRepository::new(&pool);
    if clear_existing {
        let removed = repo.delete_all().await?;
        info!(removed, "Cleared existing products");
    }

    for draft in &drafts {
        let id = repo.insert(draft).await?;
        info!(product_id = %id, name = %draft.name, "Inserted product");
    }

    info!("Seeding complete! {} products inserted", drafts.len());
    Ok(())
}
