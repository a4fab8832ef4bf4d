// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insert-side row types. Read-side records live in `voxbook-core`.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use voxbook_core::{BookingStatus, PaymentProvider, PaymentStatus};

pub use voxbook_core::{
    Booking, BookingView, CallLog, Customer, DoorAccess, Payment, Room, SurveyResponse, Venue,
};

/// Contact fields for a new customer row.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
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
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: i64,
    pub provider: PaymentProvider,
    pub status: PaymentStatus,
    pub amount: Option<BigDecimal>,
    pub currency: Option<String>,
    pub sandbox_reference: Option<String>,
    pub extras: Map<String, Value>,
}

/// A freshly generated door code for a booking.
#[derive(Debug, Clone)]
pub struct DoorCodeIssue {
    pub booking_id: i64,
    pub door_code: String,
    pub instructions: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSurvey {
    pub booking_id: i64,
    pub rating: Option<i64>,
    pub comments: Option<String>,
    pub transcript: Option<String>,
    pub action_items: Vec<String>,
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCallLog {
    pub booking_id: Option<i64>,
    pub session_id: Option<String>,
    pub call_type: Option<String>,
    pub payload: Value,
    pub transcript: Option<String>,
}
