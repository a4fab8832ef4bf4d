// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the session registry, the voice client and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Voice,
}

/// Kind of call a session was opened for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Outreach,
    Booking,
    /// Session was referenced (webhook, tool call) before any call brief arrived.
    Unknown,
}

/// One line of a call transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    #[serde(alias = "content")]
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Post-call summary attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub headline: String,
    pub notes: String,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// Where the session's booking stands, as seen by the live dashboard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SnapshotState {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

/// Booking-status snapshot embedded in a session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub status: SnapshotState,
    pub booking_id: Option<String>,
    pub room_id: Option<String>,
    pub check_in_time: Option<String>,
    pub key_token: Option<String>,
    #[serde(default)]
    pub payment_required: bool,
}

/// In-memory state of one voice-call session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub call_type: CallType,
    #[serde(default)]
    pub brief: Map<String, Value>,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    /// Call statuses in the order the provider reported them.
    #[serde(default)]
    pub statuses: Vec<String>,
    pub summary: Option<SessionSummary>,
    #[serde(default)]
    pub booking_status: BookingSnapshot,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create an empty record for `session_id`.
    pub fn new(session_id: impl Into<String>, call_type: CallType) -> Self {
        Self {
            session_id: session_id.into(),
            call_type,
            brief: Map::new(),
            transcript: Vec::new(),
            statuses: Vec::new(),
            summary: None,
            booking_status: BookingSnapshot::default(),
            created_at: Utc::now(),
        }
    }
}

/// A call brief submitted by the console to start a voice call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallBrief {
    pub session_id: String,
    pub call_type: CallType,
    #[serde(default)]
    pub target_contact: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub venue_id: Option<String>,
}

impl CallBrief {
    /// The brief as a JSON object, stored on the session record.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
