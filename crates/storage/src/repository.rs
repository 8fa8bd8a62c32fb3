//! Repository Implementation

use crate::StorageError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const CREATE_SENSOR_DATA: &str = "
    CREATE TABLE IF NOT EXISTS sensor_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ph REAL,
        conductivity REAL,
        ammonia REAL,
        prediction REAL,
        timestamp DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )";

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite connection URL
    pub url: String,
    /// Pool size
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://sensor_data.db".to_string(),
            max_connections: 4,
        }
    }
}

/// Reading to append, with the prediction computed from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewReading {
    pub ph: f64,
    pub conductivity: f64,
    pub ammonia: f64,
    pub prediction: f64,
}

/// Stored reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub id: i64,
    pub ph: f64,
    pub conductivity: f64,
    pub ammonia: f64,
    pub prediction: f64,
    pub timestamp: NaiveDateTime,
}

/// Repository over the `sensor_data` table.
///
/// Rows are only ever appended. Every query borrows a connection from the
/// pool for its own duration.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Open a pooled repository, creating the database file if needed
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let connect_err = |source| StorageError::Connect {
            url: config.url.clone(),
            source,
        };

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(connect_err)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(connect_err)?;

        info!(
            "Opened SQLite repository at {} (max_connections={})",
            config.url, config.max_connections
        );
        Ok(Self { pool })
    }

    /// Open a private in-memory repository.
    ///
    /// The pool holds exactly one connection that never expires, since the
    /// database lives only as long as that connection.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let url = "sqlite::memory:";
        let connect_err = |source| StorageError::Connect {
            url: url.to_string(),
            source,
        };

        let options = SqliteConnectOptions::from_str(url).map_err(connect_err)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(connect_err)?;

        debug!("Opened in-memory repository");
        Ok(Self { pool })
    }

    /// Create the `sensor_data` table if it does not exist
    pub async fn initialize(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_SENSOR_DATA).execute(&self.pool).await?;
        debug!("sensor_data table ready");
        Ok(())
    }

    /// Append a reading, returning its id
    pub async fn insert(&self, reading: &NewReading) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO sensor_data (ph, conductivity, ammonia, prediction) VALUES (?, ?, ?, ?)",
        )
        .bind(reading.ph)
        .bind(reading.conductivity)
        .bind(reading.ammonia)
        .bind(reading.prediction)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted reading with ID {}", id);
        Ok(id)
    }

    /// Prediction of the most recently inserted row, if any
    pub async fn latest_prediction(&self) -> Result<Option<f64>, StorageError> {
        let row: Option<(i64, Option<f64>)> = sqlx::query_as(
            "SELECT id, prediction FROM sensor_data ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some((_, Some(prediction))) => Ok(Some(prediction)),
            Some((id, None)) => Err(StorageError::Corrupt {
                id,
                reason: "prediction is NULL".to_string(),
            }),
        }
    }

    /// Most recent readings, newest first
    pub async fn recent(&self, limit: u32) -> Result<Vec<SensorRecord>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, ph, conductivity, ammonia, prediction, timestamp
             FROM sensor_data ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }

    /// Number of stored readings
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sensor_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for borrowed connections to come back
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Repository closed");
    }
}

fn row_to_record(row: &SqliteRow) -> Result<SensorRecord, StorageError> {
    let id: i64 = row.try_get("id")?;
    let required = |column: &str| -> Result<f64, StorageError> {
        let value: Option<f64> = row.try_get(column)?;
        value.ok_or_else(|| StorageError::Corrupt {
            id,
            reason: format!("{} is NULL", column),
        })
    };

    Ok(SensorRecord {
        id,
        ph: required("ph")?,
        conductivity: required("conductivity")?,
        ammonia: required("ammonia")?,
        prediction: required("prediction")?,
        timestamp: row.try_get("timestamp")?,
    })
}
