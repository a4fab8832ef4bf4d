// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events pushed to live session subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use voxbook_core::{RoomAvailability, RoomRef, SessionSummary};

/// A live event scoped to one session, serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Call or stream status, e.g. `listening` or `call.completed`.
    #[serde(rename = "status")]
    Status {
        status: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    /// Keep-alive emitted to an idle subscriber.
    #[serde(rename = "heartbeat")]
    Heartbeat { session_id: String },

    #[serde(rename = "transcript")]
    Transcript {
        role: String,
        text: String,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "availability")]
    Availability { rooms: Vec<RoomAvailability> },

    #[serde(rename = "booking.confirmed")]
    BookingConfirmed {
        booking_id: i64,
        room: Option<RoomRef>,
        door_code: Option<String>,
    },

    #[serde(rename = "customer.captured")]
    CustomerCaptured { customer: Map<String, Value> },

    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded {
        booking_id: i64,
        payment_id: i64,
        amount: Option<String>,
        currency: Option<String>,
    },

    #[serde(rename = "survey")]
    Survey { data: Value },

    #[serde(rename = "summary")]
    Summary { summary: SessionSummary },

    /// A provider tool invocation relayed verbatim.
    #[serde(rename = "tool")]
    Tool {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        payload: Value,
    },
}

impl SessionEvent {
    /// The `listening` status every stream opens with.
    pub fn listening(session_id: impl Into<String>) -> Self {
        Self::Status {
            status: "listening".to_string(),
            session_id: Some(session_id.into()),
        }
    }

    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Heartbeat { .. } => "heartbeat",
            Self::Transcript { .. } => "transcript",
            Self::Availability { .. } => "availability",
            Self::BookingConfirmed { .. } => "booking.confirmed",
            Self::CustomerCaptured { .. } => "customer.captured",
            Self::PaymentSucceeded { .. } => "payment.succeeded",
            Self::Survey { .. } => "survey",
            Self::Summary { .. } => "summary",
            Self::Tool { .. } => "tool",
        }
    }
}
