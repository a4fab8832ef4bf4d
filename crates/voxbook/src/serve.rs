// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voxbook serve`: wire every subsystem and run the gateway until a
//! shutdown signal arrives.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use voxbook_booking::BookingWorkflow;
use voxbook_bus::EventBus;
use voxbook_config::VoxbookConfig;
use voxbook_core::{PluginAdapter, StorageAdapter, VoiceProvider, VoxbookError};
use voxbook_gateway::{GatewayState, ServerConfig, WebhookAuth, start_server};
use voxbook_session::SessionRegistry;
use voxbook_storage::SqliteStorage;
use voxbook_voice::{VoiceClient, WebhookIngestor};

use crate::{seed, shutdown};

pub async fn run_serve(config: VoxbookConfig) -> Result<(), VoxbookError> {
    init_tracing(&config.server.log_level);

    info!("starting voxbook serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    seed::seed_if_present(&storage, Path::new(&config.venues.data_path)).await?;

    let registry = Arc::new(SessionRegistry::new());
    let bus = Arc::new(EventBus::new(
        Duration::from_secs(config.events.heartbeat_interval_secs),
        config.events.backlog_capacity,
    ));
    let pruner_bus = Arc::clone(&bus);
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

    let voice = Arc::new(VoiceClient::new(config.voice.clone())?);
    if !voice.is_configured() {
        warn!("voice provider credentials missing, call launch will answer 503");
    }
    if config.voice.webhook_secret.is_none() {
        warn!("webhook secret not set, provider callbacks are unauthenticated");
    }

    let state = GatewayState {
        storage: Arc::clone(&storage),
        registry,
        bus,
        workflow,
        webhooks,
        voice: Arc::clone(&voice) as Arc<dyn VoiceProvider>,
        auth: WebhookAuth {
            secret: config.voice.webhook_secret.clone(),
        },
        start_time: Instant::now(),
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        frontend_origins: config.server.frontend_origins.clone(),
    };

    let cancel = shutdown::install_signal_handler();
    let pruner = spawn_bus_pruner(
        pruner_bus,
        Duration::from_secs(config.events.backlog_ttl_secs),
        BUS_PRUNE_INTERVAL,
        cancel.clone(),
    );
    let server_cancel = cancel.clone();
    let result = start_server(&server_config, state, async move {
        server_cancel.cancelled().await;
    })
    .await;

    cancel.cancel();
    let _ = pruner.await;
    if let Err(e) = voice.shutdown().await {
        warn!(error = %e, "voice client shutdown failed");
    }
    storage.close().await?;
    info!("voxbook stopped");
    result
}

const BUS_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically drop event channels that have no subscriber and have been
/// quiet for longer than `max_idle`. Stops when `cancel` fires.
fn spawn_bus_pruner(
    bus: Arc<EventBus>,
    max_idle: Duration,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // First tick completes immediately.
        interval.tick().await;
        info!(interval_secs = every.as_secs(), "event bus pruner started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = bus.prune(max_idle);
                    if removed > 0 {
                        debug!(removed, remaining = bus.channel_count(), "bus sweep");
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("event bus pruner stopping");
                    break;
                }
            }
        }
    })
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxbook={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxbook_bus::SessionEvent;

    fn status(s: &str) -> SessionEvent {
        SessionEvent::Status {
            status: s.to_string(),
            session_id: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pruner_reclaims_abandoned_sessions_until_cancelled() {
        let bus = Arc::new(EventBus::new(Duration::from_secs(15), 16));
        for i in 0..20 {
            bus.publish(&format!("abandoned-{i}"), status("ringing"));
        }
        let _live = bus.subscribe("watched");
        assert_eq!(bus.channel_count(), 21);

        let cancel = CancellationToken::new();
        let handle = spawn_bus_pruner(
            Arc::clone(&bus),
            Duration::from_secs(300),
            Duration::from_secs(60),
            cancel.clone(),
        );

        // Backlogs younger than the idle window survive the first sweeps.
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert_eq!(bus.channel_count(), 21);

        tokio::time::sleep(Duration::from_secs(240)).await;
        assert_eq!(bus.channel_count(), 1);
        assert_eq!(bus.subscriber_count("watched"), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}
