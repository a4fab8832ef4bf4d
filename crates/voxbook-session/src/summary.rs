// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-call summaries.
//!
//! Summaries are extractive: a headline from the booking snapshot, notes
//! from the last caller turns and follow-up items derived from what is
//! still open.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};
use voxbook_bus::{EventBus, SessionEvent};
use voxbook_core::{CallType, SessionRecord, SessionSummary, SnapshotState};

use crate::registry::SessionRegistry;

/// Caller turns quoted in the summary notes.
const NOTE_TURNS: usize = 3;

/// Build a summary from a session's current state.
pub fn summarize(record: &SessionRecord) -> SessionSummary {
    let snapshot = &record.booking_status;
    let headline = match snapshot.status {
        SnapshotState::Confirmed => match (&snapshot.booking_id, &snapshot.room_id) {
            (Some(id), Some(room)) => format!("Booking {id} confirmed for room {room}"),
            (Some(id), None) => format!("Booking {id} confirmed"),
            _ => "Booking confirmed".to_string(),
        },
        SnapshotState::Failed => "Booking attempt failed".to_string(),
        SnapshotState::Pending => match record.call_type {
            CallType::Outreach => "Outreach call completed".to_string(),
            CallType::Booking => "Booking call ended without a confirmed booking".to_string(),
            CallType::Unknown => "Call completed".to_string(),
        },
    };

    let caller_turns: Vec<&str> = record
        .transcript
        .iter()
        .filter(|e| e.role != "assistant" && e.role != "system")
        .map(|e| e.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    let notes = if caller_turns.is_empty() {
        "No transcript captured.".to_string()
    } else {
        let skip = caller_turns.len().saturating_sub(NOTE_TURNS);
        caller_turns[skip..].join(" / ")
    };

    let mut action_items = Vec::new();
    match snapshot.status {
        SnapshotState::Confirmed => {
            action_items.push("Send the confirmation and door code to the customer".to_string());
        }
        SnapshotState::Failed => {
            action_items.push("Call the customer back to retry the booking".to_string());
        }
        SnapshotState::Pending if record.call_type == CallType::Booking => {
            action_items.push("Follow up to complete the booking".to_string());
        }
        SnapshotState::Pending => {}
    }
    if snapshot.payment_required {
        action_items.push("Collect outstanding payment".to_string());
    }

    SessionSummary {
        headline,
        notes,
        action_items,
    }
}

/// Generates summaries on detached tasks once a call completes.
#[derive(Clone)]
pub struct SummaryScheduler {
    registry: Arc<SessionRegistry>,
    bus: Arc<EventBus>,
}

impl SummaryScheduler {
    pub fn new(registry: Arc<SessionRegistry>, bus: Arc<EventBus>) -> Self {
        Self { registry, bus }
    }

    /// Spawn summary generation for `session_id` and return immediately.
    ///
    /// The result is stored on the session record and published as a
    /// `summary` event.
    pub fn schedule(&self, session_id: &str) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let bus = Arc::clone(&self.bus);
        let session_id = session_id.to_string();
        debug!(session_id = %session_id, "summary scheduled");

        tokio::spawn(async move {
            let Some(record) = registry.get(&session_id) else {
                return;
            };
            let summary = summarize(&record);
            registry.update_summary(&session_id, summary.clone());
            info!(session_id = %session_id, headline = %summary.headline, "summary generated");
            bus.publish(&session_id, SessionEvent::Summary { summary });
        })
    }
}
