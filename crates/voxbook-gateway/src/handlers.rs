// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST handlers: health, metadata, call launch, webhooks and the
//! front-end booking endpoints.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use voxbook_booking::BookingPayload;
use voxbook_core::{BookingView, CallBrief, CallType, SessionRecord, Venue, VoxbookError};
use voxbook_voice::{IngestOutcome, dispatch_launch};

use crate::error::{ApiError, status_error};
use crate::server::GatewayState;

const DEFAULT_RECENT_LIMIT: i64 = 25;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub booking: BookingView,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /api/metadata/venues
pub async fn list_venues(State(state): State<GatewayState>) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(state.storage.list_venues().await?))
}

/// GET /api/metadata/venues/{venue_id}
pub async fn get_venue(
    State(state): State<GatewayState>,
    Path(venue_id): Path<String>,
) -> Result<Json<Venue>, ApiError> {
    state
        .storage
        .get_venue(&venue_id)
        .await?
        .map(Json)
        .ok_or_else(|| VoxbookError::not_found("venue", venue_id).into())
}

/// GET /api/metadata/sessions/{session_id}
pub async fn get_session(
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    state
        .registry
        .get(&session_id)
        .map(Json)
        .ok_or_else(|| VoxbookError::not_found("session", session_id).into())
}

/// POST /api/calls/launch
///
/// Registers the session, then launches the call on a detached task.
pub async fn launch_call(
    State(state): State<GatewayState>,
    body: Result<Json<CallBrief>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(brief) = body?;
    if brief.session_id.trim().is_empty() {
        return Err(VoxbookError::validation("session_id", "is required").into());
    }
    if brief.call_type == CallType::Unknown {
        return Err(VoxbookError::validation("call_type", "must be outreach or booking").into());
    }
    if !state.voice.is_configured() {
        return Ok(status_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "voice provider is not configured",
        ));
    }

    let mut record = SessionRecord::new(brief.session_id.clone(), brief.call_type);
    record.brief = brief.to_map();
    state.registry.upsert(record);

    tracing::info!(session_id = %brief.session_id, call_type = %brief.call_type, "call queued");
    let session_id = brief.session_id.clone();
    dispatch_launch(Arc::clone(&state.voice), brief);

    Ok(Json(json!({"session_id": session_id, "status": "queued"})).into_response())
}

/// POST /api/calls/webhooks/voice
///
/// Always answers 200 once past the secret check; the status says whether
/// the callback was applied.
pub async fn post_webhook(State(state): State<GatewayState>, body: Bytes) -> Json<Value> {
    let outcome = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => state.webhooks.ingest(payload).await,
        Err(e) => {
            tracing::debug!(error = %e, "webhook body is not JSON");
            IngestOutcome::Ignored
        }
    };
    Json(json!({"status": outcome.as_str()}))
}

/// POST /api/booking/{session_id}/confirm
pub async fn confirm_booking(
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
    body: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<Json<BookingEnvelope>, ApiError> {
    let Json(payload) = body?;
    let confirmation = state
        .workflow
        .confirm_payload(payload, Some(&session_id))
        .await?;
    Ok(Json(BookingEnvelope {
        booking: confirmation.booking,
    }))
}

/// POST /api/booking/{booking_id}/door-code
pub async fn regenerate_door_code(
    State(state): State<GatewayState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingEnvelope>, ApiError> {
    let booking_id: i64 = booking_id
        .parse()
        .map_err(|_| VoxbookError::validation("booking_id", "must be an integer"))?;
    let booking = state.workflow.regenerate_door_code(booking_id).await?;
    Ok(Json(BookingEnvelope { booking }))
}

/// GET /api/booking/recent?limit=
pub async fn recent_bookings(
    State(state): State<GatewayState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Value>, ApiError> {
    let bookings = state
        .workflow
        .recent_bookings(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .await?;
    Ok(Json(json!({"bookings": bookings})))
}

/// GET /api/payments/recent?limit=
pub async fn recent_payments(
    State(state): State<GatewayState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 200);
    let payments = state.storage.recent_payments(limit).await?;
    Ok(Json(json!({"payments": payments})))
}
