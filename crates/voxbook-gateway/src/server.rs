// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the HTTP listener.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use voxbook_booking::BookingWorkflow;
use voxbook_bus::EventBus;
use voxbook_core::{VoiceProvider, VoxbookError};
use voxbook_session::SessionRegistry;
use voxbook_storage::SqliteStorage;
use voxbook_voice::WebhookIngestor;

use crate::auth::{WebhookAuth, webhook_auth_middleware};
use crate::{handlers, stream, tools};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub storage: Arc<SqliteStorage>,
    pub registry: Arc<SessionRegistry>,
    pub bus: Arc<EventBus>,
    pub workflow: Arc<BookingWorkflow>,
    pub webhooks: Arc<WebhookIngestor>,
    pub voice: Arc<dyn VoiceProvider>,
    pub auth: WebhookAuth,
    pub start_time: Instant,
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    pub frontend_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

/// Build the full application router.
pub fn build_router(state: GatewayState, frontend_origins: &[String]) -> Router {
    let webhook_routes = Router::new()
        .route("/api/calls/webhooks/voice", post(handlers::post_webhook))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            webhook_auth_middleware,
        ))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/metadata/venues", get(handlers::list_venues))
        .route("/api/metadata/venues/{venue_id}", get(handlers::get_venue))
        .route("/api/metadata/sessions/{session_id}", get(handlers::get_session))
        .route("/api/calls/launch", post(handlers::launch_call))
        .route("/api/tools/customer", post(tools::customer))
        .route("/api/tools/availability", post(tools::availability))
        .route("/api/tools/booking", post(tools::booking))
        .route("/api/tools/survey", post(tools::survey))
        .route("/api/tools/payment", post(tools::payment))
        .route("/api/booking/recent", get(handlers::recent_bookings))
        .route("/api/booking/{id}/confirm", post(handlers::confirm_booking))
        .route("/api/booking/{id}/door-code", post(handlers::regenerate_door_code))
        .route("/api/payments/recent", get(handlers::recent_payments))
        .with_state(state.clone());

    let stream_routes = Router::new()
        .route("/api/events/{session_id}", get(stream::sse_handler))
        .route("/ws/events/{session_id}", get(stream::ws_handler))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(webhook_routes)
        .merge(stream_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_origins))
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), VoxbookError> {
    let app = build_router(state, &config.frontend_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VoxbookError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("Voxbook listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| VoxbookError::Internal(format!("server error: {e}")))?;

    Ok(())
}
