// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full backend over a temp SQLite database and
//! a [`MockVoiceProvider`], and exposes the gateway router for
//! `tower::ServiceExt::oneshot` style tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use serde_json::Map;
use voxbook_booking::BookingWorkflow;
use voxbook_bus::EventBus;
use voxbook_config::model::{StorageConfig, VoxbookConfig};
use voxbook_core::{Room, StorageAdapter, Venue, VoiceProvider, VoxbookError};
use voxbook_gateway::{GatewayState, WebhookAuth, build_router};
use voxbook_session::SessionRegistry;
use voxbook_storage::SqliteStorage;
use voxbook_voice::WebhookIngestor;

use crate::mock_voice::MockVoiceProvider;

/// `venue-downtown` with a 4-seat `room-a` and an 8-seat `room-b`.
pub fn sample_venue() -> Venue {
    let room = |id: &str, label: &str, capacity| Room {
        id: id.to_string(),
        venue_id: "venue-downtown".into(),
        label: label.to_string(),
        capacity,
        amenities: vec!["screen".into()],
        availability: Map::new(),
    };
    Venue {
        id: "venue-downtown".into(),
        name: "Downtown Hub".into(),
        address: Some("1 Main St".into()),
        contact: Some("frontdesk@downtown.example".into()),
        policies: Map::new(),
        rooms: vec![room("room-a", "Room A", 4), room("room-b", "Room B", 8)],
    }
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    venues: Vec<Venue>,
    voice: MockVoiceProvider,
    webhook_secret: Option<String>,
    config: VoxbookConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            venues: vec![sample_venue()],
            voice: MockVoiceProvider::new(),
            webhook_secret: None,
            config: VoxbookConfig::default(),
        }
    }

    /// Replace the seeded venues.
    pub fn with_venues(mut self, venues: Vec<Venue>) -> Self {
        self.venues = venues;
        self
    }

    pub fn with_voice(mut self, voice: MockVoiceProvider) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Adjust the configuration before the harness is built.
    pub fn with_config(mut self, f: impl FnOnce(&mut VoxbookConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, VoxbookError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| VoxbookError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.voice.webhook_secret = self.webhook_secret;

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;
        storage.seed_venues(self.venues).await?;

        let registry = Arc::new(SessionRegistry::new());
        let bus = Arc::new(EventBus::new(
            Duration::from_secs(config.events.heartbeat_interval_secs),
            config.events.backlog_capacity,
        ));
        let workflow = Arc::new(BookingWorkflow::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            Arc::clone(&bus),
            config.booking.clone(),
        ));
        let webhooks = Arc::new(WebhookIngestor::new(
            Arc::clone(&registry),
            Arc::clone(&bus),
            Arc::clone(&storage),
        ));

        Ok(TestHarness {
            storage,
            registry,
            bus,
            workflow,
            webhooks,
            voice: Arc::new(self.voice),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete backend over temp storage and a mock voice provider.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub registry: Arc<SessionRegistry>,
    pub bus: Arc<EventBus>,
    pub workflow: Arc<BookingWorkflow>,
    pub webhooks: Arc<WebhookIngestor>,
    pub voice: Arc<MockVoiceProvider>,
    pub config: VoxbookConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with the default venue and a configured mock provider.
    pub async fn new() -> Result<Self, VoxbookError> {
        Self::builder().build().await
    }

    /// Gateway state sharing this harness's components.
    pub fn state(&self) -> GatewayState {
        GatewayState {
            storage: Arc::clone(&self.storage),
            registry: Arc::clone(&self.registry),
            bus: Arc::clone(&self.bus),
            workflow: Arc::clone(&self.workflow),
            webhooks: Arc::clone(&self.webhooks),
            voice: Arc::clone(&self.voice) as Arc<dyn VoiceProvider>,
            auth: WebhookAuth {
                secret: self.config.voice.webhook_secret.clone(),
            },
            start_time: Instant::now(),
        }
    }

    /// The full application router.
    pub fn router(&self) -> Router {
        build_router(self.state(), &self.config.server.frontend_origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_seeds_default_venue() {
        let harness = TestHarness::new().await.unwrap();
        let venues = harness.storage.list_venues().await.unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].rooms.len(), 2);
    }

    #[tokio::test]
    async fn builder_overrides() {
        let harness = TestHarness::builder()
            .with_venues(vec![])
            .with_webhook_secret("s3cret")
            .with_config(|c| c.booking.door_code_length = 6)
            .build()
            .await
            .unwrap();
        assert!(harness.storage.list_venues().await.unwrap().is_empty());
        assert_eq!(harness.state().auth.secret.as_deref(), Some("s3cret"));
        assert_eq!(harness.workflow.config().door_code_length, 6);
    }
}
