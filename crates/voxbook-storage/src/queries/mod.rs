// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries, one module per table.
//!
//! Functions take a plain `&rusqlite::Connection` so callers can compose
//! them inside [`Database::transaction`](crate::Database::transaction) or
//! [`Database::read`](crate::Database::read).

pub mod bookings;
pub mod call_logs;
pub mod customers;
pub mod door_access;
pub mod payments;
pub mod surveys;
pub mod venues;
