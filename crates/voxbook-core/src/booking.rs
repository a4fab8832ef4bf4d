// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent booking entities: venues, rooms, customers, bookings and the
//! rows a booking owns (payment, door access, surveys, call logs).
//!
//! Status enums render UPPERCASE through `Display`/`FromStr` (the stored
//! form) and lowercase through serde (the API form).

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// A bookable venue and its rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    #[serde(default)]
    pub policies: Map<String, Value>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// A room inside a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub venue_id: String,
    pub label: String,
    pub capacity: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub availability: Map<String, Value>,
}

/// A customer contact record, deduplicated by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Booking lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Draft,
    Pending,
    Confirmed,
    Cancelled,
}

/// Payment lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

/// Backend that recorded a payment. Neither moves real money.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Sandbox,
    Manual,
}

/// A stored booking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub session_id: Option<String>,
    pub customer_id: Option<i64>,
    pub venue_id: String,
    pub room_id: Option<String>,
    pub status: BookingStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub attendee_count: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payment recorded against a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub sandbox_reference: Option<String>,
    #[serde(default)]
    pub extras: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// The single live door-access code of a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorAccess {
    pub id: i64,
    pub booking_id: i64,
    pub door_code: String,
    pub instructions: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Post-call feedback tied to a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub booking_id: i64,
    pub rating: Option<i64>,
    pub comments: Option<String>,
    pub transcript: Option<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub context: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit record of a finished call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub id: i64,
    pub booking_id: Option<i64>,
    pub session_id: Option<String>,
    pub call_type: Option<String>,
    pub payload: Value,
    pub transcript: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Short venue reference embedded in booking views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRef {
    pub id: String,
    pub name: String,
}

/// Short room reference embedded in booking views and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: String,
    pub label: String,
    pub capacity: i64,
}

impl From<&Room> for RoomRef {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            label: room.label.clone(),
            capacity: room.capacity,
        }
    }
}

/// Availability verdict for one room over a requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAvailability {
    pub room_id: String,
    pub label: String,
    pub capacity: i64,
    pub available: bool,
    /// Why the room is unavailable, in evaluation order.
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// A booking joined with everything the console displays about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingView {
    pub id: i64,
    pub session_id: Option<String>,
    pub status: BookingStatus,
    pub customer: Option<Customer>,
    pub venue: VenueRef,
    pub room: Option<RoomRef>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub attendee_count: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
    pub payment: Option<Payment>,
    pub door_access: Option<DoorAccess>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn booking_status_stored_uppercase_served_lowercase() {
        assert_eq!(BookingStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(
            BookingStatus::from_str("CANCELLED").unwrap(),
            BookingStatus::Cancelled
        );
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }

    #[test]
    fn payment_enums_parse_stored_form() {
        assert_eq!(
            PaymentProvider::from_str("SANDBOX").unwrap(),
            PaymentProvider::Sandbox
        );
        assert_eq!(
            PaymentStatus::from_str("SUCCEEDED").unwrap(),
            PaymentStatus::Succeeded
        );
        assert!(PaymentStatus::from_str("BOUNCED").is_err());
    }
}
