// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion.
//!
//! The provider posts JSON objects tagged by an `event` field. Recognized
//! events update the session registry and are relayed on the event bus.
//! Anything malformed, unknown or without a session id is ignored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use voxbook_bus::{EventBus, SessionEvent};
use voxbook_core::TranscriptEntry;
use voxbook_session::{SessionRegistry, SummaryScheduler};
use voxbook_storage::{NewCallLog, SqliteStorage};

fn default_role() -> String {
    "assistant".to_string()
}

/// A provider webhook callback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum WebhookEvent {
    #[serde(rename = "transcript")]
    Transcript {
        #[serde(alias = "sessionId")]
        session_id: String,
        #[serde(default = "default_role")]
        role: String,
        #[serde(alias = "content", alias = "transcript")]
        text: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    #[serde(rename = "status-update")]
    StatusUpdate {
        #[serde(alias = "sessionId")]
        session_id: String,
        status: String,
    },

    #[serde(rename = "call.started")]
    CallStarted {
        #[serde(alias = "sessionId")]
        session_id: String,
    },

    #[serde(rename = "call.ringing")]
    CallRinging {
        #[serde(alias = "sessionId")]
        session_id: String,
    },

    #[serde(rename = "call.in-progress")]
    CallInProgress {
        #[serde(alias = "sessionId")]
        session_id: String,
    },

    #[serde(rename = "call.completed")]
    CallCompleted {
        #[serde(alias = "sessionId")]
        session_id: String,
        #[serde(default)]
        transcript: Option<String>,
    },

    #[serde(rename = "call.failed")]
    CallFailed {
        #[serde(alias = "sessionId")]
        session_id: String,
        #[serde(default)]
        reason: Option<String>,
    },

    #[serde(rename = "tool.invoked")]
    ToolInvoked {
        #[serde(alias = "sessionId")]
        session_id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        payload: Value,
    },

    #[serde(other)]
    Unknown,
}

impl WebhookEvent {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Transcript { session_id, .. }
            | Self::StatusUpdate { session_id, .. }
            | Self::CallStarted { session_id }
            | Self::CallRinging { session_id }
            | Self::CallInProgress { session_id }
            | Self::CallCompleted { session_id, .. }
            | Self::CallFailed { session_id, .. }
            | Self::ToolInvoked { session_id, .. } => Some(session_id.as_str()),
            Self::Unknown => None,
        }
    }

    /// Status recorded on the session for lifecycle events.
    fn status(&self) -> Option<&str> {
        match self {
            Self::StatusUpdate { status, .. } => Some(status.as_str()),
            Self::CallStarted { .. } => Some("call.started"),
            Self::CallRinging { .. } => Some("call.ringing"),
            Self::CallInProgress { .. } => Some("call.in-progress"),
            Self::CallCompleted { .. } => Some("call.completed"),
            Self::CallFailed { .. } => Some("call.failed"),
            Self::Transcript { .. } | Self::ToolInvoked { .. } | Self::Unknown => None,
        }
    }
}

/// What the ingestor did with a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    Ignored,
}

impl IngestOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Ignored => "ignored",
        }
    }
}

/// Applies webhook callbacks to sessions.
pub struct WebhookIngestor {
    registry: Arc<SessionRegistry>,
    bus: Arc<EventBus>,
    summaries: SummaryScheduler,
    storage: Arc<SqliteStorage>,
}

impl WebhookIngestor {
    pub fn new(
        registry: Arc<SessionRegistry>,
        bus: Arc<EventBus>,
        storage: Arc<SqliteStorage>,
    ) -> Self {
        let summaries = SummaryScheduler::new(Arc::clone(&registry), Arc::clone(&bus));
        Self {
            registry,
            bus,
            summaries,
            storage,
        }
    }

    /// Apply one raw callback. Never fails; unusable input is ignored.
    pub async fn ingest(&self, payload: Value) -> IngestOutcome {
        let event = match WebhookEvent::deserialize(&payload) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "webhook ignored: unparseable");
                return IngestOutcome::Ignored;
            }
        };
        let Some(session_id) = event
            .session_id()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
        else {
            debug!("webhook ignored: unknown event or no session id");
            return IngestOutcome::Ignored;
        };

        if let Some(status) = event.status() {
            self.registry.record_status(&session_id, status);
            self.bus.publish(
                &session_id,
                SessionEvent::Status {
                    status: status.to_string(),
                    session_id: Some(session_id.clone()),
                },
            );
        }

        match event {
            WebhookEvent::Transcript {
                role,
                text,
                timestamp,
                ..
            } => {
                let timestamp = timestamp.unwrap_or_else(Utc::now);
                self.registry.append_transcript(
                    &session_id,
                    TranscriptEntry {
                        role: role.clone(),
                        text: text.clone(),
                        timestamp,
                    },
                );
                self.bus.publish(
                    &session_id,
                    SessionEvent::Transcript {
                        role,
                        text,
                        timestamp,
                    },
                );
            }
            WebhookEvent::ToolInvoked { name, payload, .. } => {
                self.bus
                    .publish(&session_id, SessionEvent::Tool { name, payload });
            }
            WebhookEvent::CallCompleted { transcript, .. } => {
                self.summaries.schedule(&session_id);
                self.log_call(&session_id, transcript, payload).await;
                info!(session_id = %session_id, "call completed");
            }
            WebhookEvent::CallFailed { reason, .. } => {
                warn!(session_id = %session_id, reason = ?reason, "call failed");
            }
            _ => {}
        }
        IngestOutcome::Accepted
    }

    async fn log_call(&self, session_id: &str, transcript: Option<String>, payload: Value) {
        let record = self.registry.get(session_id);
        let transcript = transcript.or_else(|| {
            record.as_ref().filter(|r| !r.transcript.is_empty()).map(|r| {
                r.transcript
                    .iter()
                    .map(|t| format!("{}: {}", t.role, t.text))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        });
        let log = NewCallLog {
            booking_id: None,
            session_id: Some(session_id.to_string()),
            call_type: record.map(|r| r.call_type.to_string()),
            payload,
            transcript,
        };
        if let Err(e) = self.storage.record_call_log(log).await {
            warn!(session_id, error = %e, "failed to store call log");
        }
    }
}
