//! Storage Layer
//!
//! Append-only SQLite log of sensor readings and the predictions computed
//! from them, behind a managed connection pool.

mod repository;

pub use repository::{NewReading, Repository, SensorRecord, StorageConfig};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open database {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}
