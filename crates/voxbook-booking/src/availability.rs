// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room availability over a requested window.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use voxbook_config::model::BookingConfig;
use voxbook_core::{Room, RoomAvailability, VoxbookError};
use voxbook_storage::queries;

use voxbook_storage::TxError;

use crate::payload::{parse_minutes, parse_optional_count, parse_timestamp};

pub const REASON_OVERLAP: &str = "Existing booking overlaps with requested time";
pub const REASON_CAPACITY: &str = "Capacity too small for requested attendees";

/// Availability question as sent by the voice agent's tool call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "venueId")]
    pub venue_id: Option<String>,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<Value>,
    #[serde(default, alias = "attendees")]
    pub attendee_count: Option<Value>,
}

/// A validated availability request.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    pub session_id: Option<String>,
    pub venue_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub attendee_count: Option<i64>,
}

impl AvailabilityRequest {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes)
    }
}

impl AvailabilityQuery {
    pub fn normalize(self, defaults: &BookingConfig) -> Result<AvailabilityRequest, VoxbookError> {
        let start_time = match self.start_time.as_deref() {
            Some(raw) => parse_timestamp(raw, "start_time")?,
            None => return Err(VoxbookError::validation("start_time", "is required")),
        };
        let duration_minutes = match &self.duration_minutes {
            Some(v) if !v.is_null() => parse_minutes(v, "duration_minutes")?,
            _ => defaults.default_duration_minutes,
        };
        let attendee_count = parse_optional_count(self.attendee_count.as_ref(), "attendee_count")?;
        Ok(AvailabilityRequest {
            session_id: self.session_id.filter(|s| !s.trim().is_empty()),
            venue_id: self
                .venue_id
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults.default_venue_id.clone()),
            start_time,
            duration_minutes,
            attendee_count,
        })
    }
}

/// Tool response for an availability check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    pub session_id: Option<String>,
    pub venue_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub rooms: Vec<RoomAvailability>,
}

/// Half-open interval overlap: `[a_start, a_end)` against `[b_start, b_end)`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Verdict for one room given whether it is already booked over the window.
pub fn room_verdict(room: &Room, booked: bool, attendees: Option<i64>) -> RoomAvailability {
    let mut reasons = Vec::new();
    if booked {
        reasons.push(REASON_OVERLAP.to_string());
    }
    if attendees.is_some_and(|n| n > room.capacity) {
        reasons.push(REASON_CAPACITY.to_string());
    }
    RoomAvailability {
        room_id: room.id.clone(),
        label: room.label.clone(),
        capacity: room.capacity,
        available: reasons.is_empty(),
        reasons,
    }
}

/// Evaluate every room of the requested venue, in the venue's room order.
///
/// An unknown venue is a `NotFound` error; a venue without rooms yields an
/// empty list.
pub fn evaluate(
    conn: &Connection,
    request: &AvailabilityRequest,
) -> Result<Vec<RoomAvailability>, TxError> {
    if queries::venues::get_venue(conn, &request.venue_id)?.is_none() {
        return Err(VoxbookError::not_found("venue", &request.venue_id).into());
    }
    let end = request.end_time();
    queries::venues::rooms_for_venue(conn, &request.venue_id)?
        .iter()
        .map(|room| {
            let booked =
                queries::bookings::count_overlapping(conn, &room.id, &request.start_time, &end)?
                    > 0;
            Ok(room_verdict(room, booked, request.attendee_count))
        })
        .collect()
}
