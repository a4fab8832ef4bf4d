// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The booking workflow: confirm, door-code regeneration, mock payments,
//! surveys and customer capture.
//!
//! Each write runs as one storage transaction. Session snapshots and live
//! events are updated only after the transaction commits.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use voxbook_bus::{EventBus, SessionEvent};
use voxbook_config::model::BookingConfig;
use voxbook_core::{
    BookingSnapshot, BookingStatus, BookingView, RoomRef, SnapshotState, VoxbookError,
};
use voxbook_session::SessionRegistry;
use voxbook_storage::models::{Customer, NewBooking, NewCustomer, NewSurvey, Payment, SurveyResponse};
use voxbook_storage::{SqliteStorage, TxError, queries};

use crate::availability::{self, AvailabilityReport, AvailabilityRequest};
use crate::door::DoorIssuer;
use crate::payload::{BookingPayload, BookingRequest, CustomerInput, currency_or_default, parse_amount};
use crate::payments::record_sandbox_payment;

/// Result of a confirm call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub status: BookingStatus,
    pub room: Option<RoomRef>,
    pub door_code: Option<String>,
    pub booking: BookingView,
    /// True when an identical booking already existed and was returned as is.
    #[serde(skip)]
    pub deduplicated: bool,
}

impl BookingConfirmation {
    fn from_view(view: BookingView, deduplicated: bool) -> Self {
        Self {
            booking_id: view.id,
            status: view.status,
            room: view.room.clone(),
            door_code: view.door_access.as_ref().map(|d| d.door_code.clone()),
            booking: view,
            deduplicated,
        }
    }
}

/// Mock payment recorded by the voice agent's payment tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockPaymentRequest {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "bookingId")]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Post-call survey as reported by the voice agent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SurveyInput {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "bookingId")]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default, alias = "actionItems")]
    pub action_items: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Coordinates storage, the session registry and the event bus for
/// booking operations.
pub struct BookingWorkflow {
    storage: Arc<SqliteStorage>,
    registry: Arc<SessionRegistry>,
    bus: Arc<EventBus>,
    config: BookingConfig,
    door: DoorIssuer,
}

impl BookingWorkflow {
    pub fn new(
        storage: Arc<SqliteStorage>,
        registry: Arc<SessionRegistry>,
        bus: Arc<EventBus>,
        config: BookingConfig,
    ) -> Self {
        let door = DoorIssuer::from_config(&config);
        Self {
            storage,
            registry,
            bus,
            config,
            door,
        }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Check every room of the requested venue and publish the verdicts to
    /// the session, if one is named.
    pub async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityReport, VoxbookError> {
        let query = request.clone();
        let rooms = self
            .storage
            .database()?
            .transaction(move |tx| availability::evaluate(tx, &query))
            .await?;

        if let Some(session_id) = &request.session_id {
            self.bus.publish(
                session_id,
                SessionEvent::Availability {
                    rooms: rooms.clone(),
                },
            );
        }
        debug!(
            venue_id = %request.venue_id,
            available = rooms.iter().filter(|r| r.available).count(),
            "availability evaluated"
        );

        Ok(AvailabilityReport {
            session_id: request.session_id,
            venue_id: request.venue_id,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            rooms,
        })
    }

    /// Normalize and confirm a booking payload.
    pub async fn confirm_payload(
        &self,
        payload: BookingPayload,
        session_override: Option<&str>,
    ) -> Result<BookingConfirmation, VoxbookError> {
        let request = payload.normalize(session_override, &self.config)?;
        self.confirm(request).await
    }

    /// Confirm a booking.
    ///
    /// A repeat of the same session, room and start returns the stored
    /// booking without writing or publishing anything. Otherwise the
    /// customer upsert, booking insert, optional payment and door code are
    /// written in one transaction.
    pub async fn confirm(
        &self,
        request: BookingRequest,
    ) -> Result<BookingConfirmation, VoxbookError> {
        let session_id = request.session_id.clone();
        let door = self.door.clone();
        let result = self
            .storage
            .database()?
            .transaction(move |tx| confirm_in_tx(tx, &request, &door))
            .await;

        let confirmation = match result {
            Ok(c) => c,
            Err(e) => {
                self.mark_failed(&session_id);
                return Err(e);
            }
        };

        if confirmation.deduplicated {
            debug!(
                session_id = %session_id,
                booking_id = confirmation.booking_id,
                "duplicate confirm, returning existing booking"
            );
            return Ok(confirmation);
        }

        self.registry
            .update_booking_status(&session_id, snapshot_of(&confirmation.booking));
        self.bus.publish(
            &session_id,
            SessionEvent::BookingConfirmed {
                booking_id: confirmation.booking_id,
                room: confirmation.room.clone(),
                door_code: confirmation.door_code.clone(),
            },
        );
        info!(
            session_id = %session_id,
            booking_id = confirmation.booking_id,
            "booking confirmed"
        );
        Ok(confirmation)
    }

    fn mark_failed(&self, session_id: &str) {
        let Some(record) = self.registry.get(session_id) else {
            return;
        };
        if record.booking_status.status != SnapshotState::Confirmed {
            self.registry.update_booking_status(
                session_id,
                BookingSnapshot {
                    status: SnapshotState::Failed,
                    ..record.booking_status
                },
            );
        }
    }

    /// Replace a booking's door code.
    pub async fn regenerate_door_code(&self, booking_id: i64) -> Result<BookingView, VoxbookError> {
        let door = self.door.clone();
        let view = self
            .storage
            .database()?
            .transaction(move |tx| {
                let booking = queries::bookings::get_booking(tx, booking_id)?
                    .ok_or_else(|| VoxbookError::not_found("booking", booking_id.to_string()))?;
                door.issue(tx, &booking, "regenerated")?;
                Ok(queries::bookings::view(tx, booking)?)
            })
            .await?;

        if let Some(session_id) = &view.session_id
            && self.registry.get(session_id).is_some()
        {
            self.registry
                .update_booking_status(session_id, snapshot_of(&view));
        }
        info!(booking_id, "door code regenerated");
        Ok(view)
    }

    pub async fn booking(&self, booking_id: i64) -> Result<BookingView, VoxbookError> {
        self.storage
            .database()?
            .read(move |conn| queries::bookings::get_view(conn, booking_id))
            .await?
            .ok_or_else(|| VoxbookError::not_found("booking", booking_id.to_string()))
    }

    /// Newest bookings by start time.
    pub async fn recent_bookings(&self, limit: i64) -> Result<Vec<BookingView>, VoxbookError> {
        let limit = limit.clamp(1, 200);
        self.storage
            .database()?
            .read(move |conn| queries::bookings::recent_views(conn, limit))
            .await
    }

    /// Record a sandbox payment for a booking named directly or through its
    /// session, then publish `payment.succeeded`.
    pub async fn record_mock_payment(
        &self,
        request: MockPaymentRequest,
    ) -> Result<Payment, VoxbookError> {
        let amount = match &request.amount {
            Some(v) if !v.is_null() => parse_amount(v, "amount")?,
            _ => return Err(VoxbookError::validation("amount", "is required")),
        };
        let currency = currency_or_default(request.currency.clone(), "currency", &self.config)?;
        let session_id = request.session_id.clone();

        let payment = self
            .storage
            .database()?
            .transaction(move |tx| {
                let booking_id = resolve_booking(tx, request.booking_id, request.session_id.as_deref())?;
                Ok(record_sandbox_payment(tx, booking_id, Some(amount), &currency, "voice-agent")?)
            })
            .await?;

        if let Some(session_id) = &session_id {
            self.bus.publish(
                session_id,
                SessionEvent::PaymentSucceeded {
                    booking_id: payment.booking_id,
                    payment_id: payment.id,
                    amount: payment.amount.as_ref().map(BigDecimal::to_string),
                    currency: payment.currency.clone(),
                },
            );
        }
        info!(booking_id = payment.booking_id, payment_id = payment.id, "sandbox payment recorded");
        Ok(payment)
    }

    /// Publish a survey to its session and store it when a booking can be
    /// resolved. Returns the stored row, if any.
    pub async fn log_survey(
        &self,
        survey: SurveyInput,
    ) -> Result<Option<SurveyResponse>, VoxbookError> {
        if let Some(rating) = survey.rating
            && !(1..=5).contains(&rating)
        {
            return Err(VoxbookError::validation("rating", "must be between 1 and 5"));
        }
        if let Some(session_id) = &survey.session_id {
            let data = serde_json::to_value(&survey).map_err(|e| VoxbookError::Internal(e.to_string()))?;
            self.bus.publish(session_id, SessionEvent::Survey { data });
        }

        let stored = self
            .storage
            .database()?
            .transaction(move |tx| {
                let booking_id = match survey.booking_id {
                    Some(id) => Some(id),
                    None => match survey.session_id.as_deref() {
                        Some(s) => queries::bookings::latest_for_session(tx, s)?,
                        None => None,
                    },
                };
                let Some(booking_id) = booking_id else {
                    return Ok(None);
                };
                if queries::bookings::get_booking(tx, booking_id)?.is_none() {
                    return Err(VoxbookError::not_found("booking", booking_id.to_string()).into());
                }
                let row = queries::surveys::insert_survey(
                    tx,
                    &NewSurvey {
                        booking_id,
                        rating: survey.rating,
                        comments: survey.comments,
                        transcript: survey.transcript,
                        action_items: survey.action_items,
                        context: survey.extra,
                    },
                )?;
                Ok(Some(row))
            })
            .await?;

        if stored.is_none() {
            warn!("survey has no resolvable booking, published only");
        }
        Ok(stored)
    }

    /// Merge customer details into the session brief and publish
    /// `customer.captured`. Returns the merged customer block.
    pub fn capture_customer(&self, session_id: &str, customer: CustomerInput) -> Map<String, Value> {
        let merged = self
            .registry
            .merge_brief(session_id, "customer", customer.cleaned().to_map());
        self.bus.publish(
            session_id,
            SessionEvent::CustomerCaptured {
                customer: merged.clone(),
            },
        );
        merged
    }
}

fn confirm_in_tx(
    tx: &Connection,
    request: &BookingRequest,
    door: &DoorIssuer,
) -> Result<BookingConfirmation, TxError> {
    if let Some(id) = queries::bookings::find_duplicate(
        tx,
        &request.session_id,
        request.room_id.as_deref(),
        &request.start_time,
    )? {
        let view = queries::bookings::get_view(tx, id)?
            .ok_or_else(|| VoxbookError::not_found("booking", id.to_string()))?;
        return Ok(BookingConfirmation::from_view(view, true));
    }

    let customer = upsert_customer(tx, &request.customer)?;

    let venue = queries::venues::get_venue(tx, &request.venue_id)?
        .ok_or_else(|| VoxbookError::not_found("venue", &request.venue_id))?;
    if let Some(room_id) = &request.room_id
        && !venue.rooms.iter().any(|r| &r.id == room_id)
    {
        return Err(VoxbookError::not_found("room", room_id).into());
    }

    let end_time = end_time(request);
    let booking = queries::bookings::insert_booking(
        tx,
        &NewBooking {
            session_id: Some(request.session_id.clone()),
            customer_id: customer.map(|c| c.id),
            venue_id: venue.id,
            room_id: request.room_id.clone(),
            status: BookingStatus::Confirmed,
            start_time: Some(request.start_time),
            end_time: Some(end_time),
            duration_minutes: Some(request.duration_minutes),
            attendee_count: request.attendee_count,
            notes: request.notes.clone(),
            details: request.details.clone(),
        },
    )
    .map_err(conflict_on_constraint)?;

    if let Some(payment) = &request.payment {
        record_sandbox_payment(
            tx,
            booking.id,
            Some(payment.amount.clone()),
            &payment.currency,
            "booking",
        )?;
    }
    door.issue(tx, &booking, "confirmation")?;

    let view = queries::bookings::view(tx, booking)?;
    Ok(BookingConfirmation::from_view(view, false))
}

/// End of the booked window: the later of `details.end_time` and
/// start plus duration.
fn end_time(request: &BookingRequest) -> DateTime<Utc> {
    let computed = request.start_time + Duration::minutes(request.duration_minutes);
    request
        .end_time
        .map_or(computed, |explicit| explicit.max(computed))
}

/// Match by email and refresh the stored contact, or insert a new customer.
/// An empty contact block books without a customer.
fn upsert_customer(tx: &Connection, input: &CustomerInput) -> Result<Option<Customer>, TxError> {
    if input.is_empty() {
        return Ok(None);
    }
    if let Some(email) = &input.email
        && let Some(mut existing) = queries::customers::find_by_email(tx, email)?
    {
        if let Some(name) = &input.name {
            existing.name = Some(name.clone());
        }
        if let Some(phone) = &input.phone_number {
            existing.phone_number = Some(phone.clone());
        }
        existing
            .attributes
            .extend(input.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        queries::customers::update_customer(tx, &existing)?;
        return Ok(Some(existing));
    }

    let customer = queries::customers::insert_customer(
        tx,
        &NewCustomer {
            external_id: None,
            name: input.name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            attributes: input.attributes.clone(),
        },
    )?;
    Ok(Some(customer))
}

fn resolve_booking(
    tx: &Connection,
    booking_id: Option<i64>,
    session_id: Option<&str>,
) -> Result<i64, TxError> {
    let resolved = match (booking_id, session_id) {
        (Some(id), _) => queries::bookings::get_booking(tx, id)?.map(|b| b.id),
        (None, Some(session)) => queries::bookings::latest_for_session(tx, session)?,
        (None, None) => {
            return Err(VoxbookError::validation("booking_id", "or session_id is required").into());
        }
    };
    resolved.ok_or_else(|| {
        let key = booking_id
            .map(|id| id.to_string())
            .or(session_id.map(|s| format!("session {s}")))
            .unwrap_or_default();
        VoxbookError::not_found("booking", key).into()
    })
}

fn conflict_on_constraint(e: rusqlite::Error) -> TxError {
    match e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            VoxbookError::Conflict("booking already exists for this session, room and start".into())
                .into()
        }
        other => other.into(),
    }
}

/// Session snapshot for a confirmed booking.
pub fn snapshot_of(view: &BookingView) -> BookingSnapshot {
    BookingSnapshot {
        status: SnapshotState::Confirmed,
        booking_id: Some(view.id.to_string()),
        room_id: view.room.as_ref().map(|r| r.id.clone()),
        check_in_time: view
            .start_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        key_token: view.door_access.as_ref().map(|d| d.door_code.clone()),
        payment_required: false,
    }
}
