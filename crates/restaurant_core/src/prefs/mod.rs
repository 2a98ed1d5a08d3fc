//! Local key-value preference cache.
//!
//! # Responsibility
//! - Define the async contract for the on-device key-value store.
//! - Provide SQLite-backed and in-process implementations.
//! - Own the `showReviews` override key format and value codec.
//!
//! # Invariants
//! - `remove` of a missing key succeeds.
//! - Stored values are opaque strings; callers own the serialization.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod show_reviews;
mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

pub type PrefResult<T> = Result<T, PrefError>;

/// Local store failure.
#[derive(Debug)]
pub enum PrefError {
    /// Backing database failure.
    Db(DbError),
    /// Store cannot serve the request right now.
    Unavailable(String),
    /// Blocking worker failed before producing a result.
    Worker(String),
}

impl Display for PrefError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(details) => write!(f, "preference store unavailable: {details}"),
            Self::Worker(details) => write!(f, "preference store worker failed: {details}"),
        }
    }
}

impl Error for PrefError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::Worker(_) => None,
        }
    }
}

impl From<DbError> for PrefError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PrefError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// On-device key-value store holding serialized preference values.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the serialized value for `key`, or `None` when absent.
    async fn get(&self, key: &str) -> PrefResult<Option<String>>;
    /// Inserts or replaces the value for `key`.
    async fn set(&self, key: &str, value: &str) -> PrefResult<()>;
    /// Removes `key`; succeeds when the key does not exist.
    async fn remove(&self, key: &str) -> PrefResult<()>;
}
