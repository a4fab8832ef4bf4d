// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle, PRAGMA setup and transactions.
//!
//! Every statement runs on tokio-rusqlite's single background thread, which
//! makes the [`Database`] the only writer. Do not open a second connection
//! for writes.

use thiserror::Error;
use tracing::debug;
use voxbook_core::VoxbookError;

use crate::migrations::run_migrations;

/// Failure inside a [`Database::transaction`] closure.
///
/// Either variant rolls the transaction back.
#[derive(Debug, Error)]
pub enum TxError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// A domain rule failed (unknown room, invalid input, ...).
    #[error(transparent)]
    Domain(#[from] VoxbookError),
}

/// Handle to the booking database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and
    /// apply migrations.
    pub async fn open(path: &str) -> Result<Self, VoxbookError> {
        Self::open_with(path, true).await
    }

    /// Like [`open`](Self::open) with explicit journal mode choice.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, VoxbookError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| VoxbookError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| VoxbookError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Private in-memory database, used by tests.
    pub async fn open_in_memory() -> Result<Self, VoxbookError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| VoxbookError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), VoxbookError> {
        self.conn
            .call(move |conn| {
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
                }
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA busy_timeout = 5000;",
                )?;
                run_migrations(conn).map_err(TxError::Domain)
            })
            .await
            .map_err(map_tx_err)
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Run `f` inside one IMMEDIATE transaction.
    ///
    /// The transaction commits only if `f` returns `Ok`; otherwise it is
    /// dropped and rolled back. Domain errors raised by `f` come back
    /// unchanged.
    pub async fn transaction<F, R>(&self, f: F) -> Result<R, VoxbookError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<R, TxError> + Send + 'static,
        R: Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
                let out = f(&tx)?;
                tx.commit()?;
                Ok(out)
            })
            .await
            .map_err(map_tx_err)
    }

    /// Run a read-only closure against the connection.
    pub async fn read<F, R>(&self, f: F) -> Result<R, VoxbookError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<R, rusqlite::Error> + Send + 'static,
        R: Send + 'static,
    {
        self.conn.call(move |conn| f(conn)).await.map_err(map_tr_err)
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), VoxbookError> {
        self.conn
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Convert a tokio-rusqlite error into [`VoxbookError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VoxbookError {
    VoxbookError::Storage {
        source: Box::new(e),
    }
}

fn map_tx_err(e: tokio_rusqlite::Error<TxError>) -> VoxbookError {
    match e {
        tokio_rusqlite::Error::Error(TxError::Domain(err)) => err,
        tokio_rusqlite::Error::Error(TxError::Sqlite(err)) => VoxbookError::Storage {
            source: Box::new(err),
        },
        other => VoxbookError::Storage {
            source: other.to_string().into(),
        },
    }
}
