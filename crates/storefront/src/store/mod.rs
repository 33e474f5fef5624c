//! Flat-file JSON storage.
//!
//! Each file under the data directory holds one JSON array that is read and
//! rewritten in full on every mutation:
//!
//! - `products.json` - admin catalog ([`ProductCatalog`])
//! - `orders.json` - audit copy of placed orders ([`OrderArchive`])
//! - `forum_topics.json` - topics with embedded replies ([`ForumStore`])
//!
//! Writers to one file are serialized by a per-file async mutex, and every
//! write goes to a temporary sibling that is then renamed over the original,
//! so readers never observe a half-written file. A serialized body that does
//! not parse back into the same records is never written.

pub mod catalog;
pub mod forum;
pub mod orders;

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

pub use catalog::{CatalogStats, ProductCatalog};
pub use forum::{ForumStore, NewTopic};
pub use orders::OrderArchive;

/// Errors from reading or writing a JSON data file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a JSON array of the expected records.
    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The records serialize to JSON that cannot be read back.
    #[error("refusing to write {path}: records do not read back ({reason})")]
    Unreadable { path: PathBuf, reason: String },

    /// Every positive `i32` is already taken as an ID.
    #[error("no product IDs left in {path}")]
    IdsExhausted { path: PathBuf },

    /// A computed amount exceeds the decimal range.
    #[error("amount out of range in {path}")]
    AmountOverflow { path: PathBuf },
}

/// A JSON array file of `T` records.
pub struct JsonFile<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    /// Create a handle for the file at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing or empty file reads as no records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read and
    /// `StoreError::Malformed` if it does not hold a JSON array of `T`.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Read-modify-write under the file's lock.
    ///
    /// `apply` returns `Some` to commit its changes or `None` to leave the
    /// file untouched (e.g. the record to change was not found).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or replaced.
    pub async fn update<R, F>(&self, apply: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> Option<R>,
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let Some(outcome) = apply(&mut records) else {
            return Ok(None);
        };

        self.replace(&records).await?;
        Ok(Some(outcome))
    }

    /// Read-modify-write under the file's lock, always committing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or replaced.
    pub async fn modify<R, F>(&self, apply: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let outcome = apply(&mut records);

        self.replace(&records).await?;
        Ok(outcome)
    }

    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read, parsed or replaced.
    pub async fn append(&self, record: T) -> Result<(), StoreError> {
        self.modify(|records| records.push(record)).await
    }

    /// Write `records` to a temporary sibling and rename it over the file.
    async fn replace(&self, records: &[T]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        }

        let mut body = serde_json::to_vec_pretty(records).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        body.push(b'\n');
        self.verify_round_trip(records, &body)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "JSON file written");
        Ok(())
    }

    /// Check that `body` parses back into exactly `records`.
    fn verify_round_trip(&self, records: &[T], body: &[u8]) -> Result<(), StoreError> {
        let unreadable = |reason: String| StoreError::Unreadable {
            path: self.path.clone(),
            reason,
        };

        let parsed: Vec<T> = serde_json::from_slice(body).map_err(|e| unreadable(e.to_string()))?;
        if parsed.as_slice() != records {
            return Err(unreadable("values change when read back".to_string()));
        }
        Ok(())
    }
}
