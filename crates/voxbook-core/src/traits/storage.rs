// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the booking database.

use async_trait::async_trait;

use crate::error::VoxbookError;
use crate::traits::adapter::PluginAdapter;

/// Lifecycle of the persistence backend holding venues and bookings.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Open the backend and apply pending migrations.
    async fn initialize(&self) -> Result<(), VoxbookError>;

    /// Flush pending writes and close connections.
    async fn close(&self) -> Result<(), VoxbookError>;
}
