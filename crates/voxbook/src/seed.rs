// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venue seeding, both as a subcommand and at server startup.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use voxbook_config::VoxbookConfig;
use voxbook_core::{StorageAdapter, VoxbookError};
use voxbook_storage::SqliteStorage;
use voxbook_storage::seed::load_venues_file;

/// `voxbook seed`: the seed file must exist.
pub async fn run_seed(config: VoxbookConfig, file: Option<PathBuf>) -> Result<(), VoxbookError> {
    let path = file.unwrap_or_else(|| PathBuf::from(&config.venues.data_path));
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let venues = load_venues_file(&path)?;
    let total = venues.len();
    let added = storage.seed_venues(venues).await?;
    storage.close().await?;

    println!("seeded {added} of {total} venues from {}", path.display());
    Ok(())
}

/// Startup seeding: a missing file only logs a warning.
pub async fn seed_if_present(storage: &SqliteStorage, path: &Path) -> Result<usize, VoxbookError> {
    if !path.exists() {
        warn!(path = %path.display(), "venue seed file not found, skipping");
        return Ok(0);
    }
    let venues = load_venues_file(path)?;
    let added = storage.seed_venues(venues).await?;
    info!(path = %path.display(), added, "venues loaded");
    Ok(added)
}
