// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for venues, bookings and everything a booking owns.
//!
//! WAL-mode SQLite with embedded migrations, a single writer through
//! `tokio-rusqlite`, typed per-table queries and closure-based
//! transactions.

pub mod adapter;
mod columns;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

#[cfg(test)]
pub(crate) mod fixtures;

pub use adapter::SqliteStorage;
pub use columns::ts as format_timestamp;
pub use database::{Database, TxError, map_tr_err};
pub use models::*;
