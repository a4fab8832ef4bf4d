// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use voxbook_config::model::StorageConfig;
use voxbook_core::{
    AdapterType, CallLog, HealthStatus, Payment, PluginAdapter, StorageAdapter, Venue,
    VoxbookError,
};

use crate::database::Database;
use crate::models::NewCallLog;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// method fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`initialize`](StorageAdapter::initialize).
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn from_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// The open database handle.
    pub fn database(&self) -> Result<&Database, VoxbookError> {
        self.db.get().ok_or_else(|| VoxbookError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }

    pub async fn list_venues(&self) -> Result<Vec<Venue>, VoxbookError> {
        self.database()?.read(queries::venues::list_venues).await
    }

    pub async fn get_venue(&self, venue_id: &str) -> Result<Option<Venue>, VoxbookError> {
        let venue_id = venue_id.to_string();
        self.database()?
            .read(move |conn| queries::venues::get_venue(conn, &venue_id))
            .await
    }

    pub async fn recent_payments(&self, limit: i64) -> Result<Vec<Payment>, VoxbookError> {
        self.database()?
            .read(move |conn| queries::payments::recent_payments(conn, limit))
            .await
    }

    /// Store a call log, attaching it to the session's newest booking when
    /// no booking id is given.
    pub async fn record_call_log(&self, mut log: NewCallLog) -> Result<CallLog, VoxbookError> {
        self.database()?
            .transaction(move |tx| {
                if log.booking_id.is_none()
                    && let Some(session_id) = log.session_id.as_deref()
                {
                    log.booking_id = queries::bookings::latest_for_session(tx, session_id)?;
                }
                Ok(queries::call_logs::insert_call_log(tx, &log)?)
            })
            .await
    }

    /// Insert venues that are not stored yet. Returns how many were added.
    pub async fn seed_venues(&self, venues: Vec<Venue>) -> Result<usize, VoxbookError> {
        let added = self
            .database()?
            .transaction(move |tx| {
                let mut added = 0;
                for venue in &venues {
                    if queries::venues::insert_venue_if_absent(tx, venue)? {
                        added += 1;
                    }
                }
                Ok(added)
            })
            .await?;
        info!(added, "venue seed applied");
        Ok(added)
    }

    async fn checkpoint(&self) -> Result<(), VoxbookError> {
        self.database()?
            .read(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VoxbookError> {
        match self.db.get() {
            None => Ok(HealthStatus::Unhealthy("not initialized".into())),
            Some(db) => {
                db.read(|conn| conn.execute_batch("SELECT 1;")).await?;
                Ok(HealthStatus::Healthy)
            }
        }
    }

    async fn shutdown(&self) -> Result<(), VoxbookError> {
        if self.db.initialized() {
            self.checkpoint().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), VoxbookError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VoxbookError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VoxbookError> {
        self.checkpoint().await
    }
}
