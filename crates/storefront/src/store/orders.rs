//! Audit copy of placed orders kept in `orders.json`.

use std::path::Path;

use super::{JsonFile, StoreError};
use crate::models::OrderRecord;

/// File name of the order archive inside the data directory.
pub const FILE_NAME: &str = "orders.json";

/// Append-only archive of orders committed to the database.
pub struct OrderArchive {
    file: JsonFile<OrderRecord>,
}

impl OrderArchive {
    /// Open the archive inside `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join(FILE_NAME)),
        }
    }

    /// Append one order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or written.
    pub async fn append(&self, record: OrderRecord) -> Result<(), StoreError> {
        self.file.append(record).await
    }

    /// Find an archived order by its order number.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or parsed.
    pub async fn find(&self, order_number: &str) -> Result<Option<OrderRecord>, StoreError> {
        Ok(self
            .file
            .load()
            .await?
            .into_iter()
            .find(|order| order.order_number == order_number))
    }
}
