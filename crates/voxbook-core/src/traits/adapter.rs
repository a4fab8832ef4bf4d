// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait.

use async_trait::async_trait;

use crate::error::VoxbookError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health and lifecycle shared by every backend adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Human-readable adapter name, used in logs and `/health`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Probe the backend and report its current status.
    async fn health_check(&self) -> Result<HealthStatus, VoxbookError>;

    /// Release held resources. Called once during graceful shutdown.
    async fn shutdown(&self) -> Result<(), VoxbookError>;
}
