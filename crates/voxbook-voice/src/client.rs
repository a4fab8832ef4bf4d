// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the voice provider's call API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use voxbook_config::model::VoiceConfig;
use voxbook_core::{
    AdapterType, CallBrief, CallType, HealthStatus, PluginAdapter, VoiceProvider, VoxbookError,
};

/// Tools the assistant may call back into during a call.
const TOOLS: [(&str, &str); 5] = [
    ("customer", "Store the caller's name, email and phone number."),
    ("availability", "Check which rooms are free for a date, time and headcount."),
    ("booking", "Confirm a room booking and receive the door code."),
    ("payment", "Record a sandbox payment for the booking."),
    ("survey", "Log post-call feedback."),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchRequest<'a> {
    session_id: &'a str,
    call_type: CallType,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<&'a str>,
    server_url: String,
    metadata: LaunchMetadata<'a>,
    assistant: AssistantSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchMetadata<'a> {
    target_contact: Option<&'a str>,
    objective: Option<&'a str>,
    notes: Option<&'a str>,
    venue_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantSpec {
    name: String,
    first_message: String,
    instructions: String,
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    name: &'static str,
    description: &'static str,
    url: String,
}

fn assistant_for(brief: &CallBrief, backend: &str) -> AssistantSpec {
    let (name, first_message, instructions) = match brief.call_type {
        CallType::Outreach => (
            "Voxbook Outreach",
            "Hi, I'm calling on behalf of Voxbook about a room booking.",
            "Introduce yourself, explain the objective from the call metadata and \
             capture the contact's details with the customer tool.",
        ),
        CallType::Booking | CallType::Unknown => (
            "Voxbook Concierge",
            "Hi, thanks for calling. Which day and time would you like to book?",
            "Collect the date, start time, duration and headcount. Check availability \
             before confirming. Read back the door code once the booking is confirmed.",
        ),
    };
    AssistantSpec {
        name: name.to_string(),
        first_message: first_message.to_string(),
        instructions: instructions.to_string(),
        tools: TOOLS
            .iter()
            .map(|&(tool, description)| ToolSpec {
                name: tool,
                description,
                url: format!("{backend}/api/tools/{tool}"),
            })
            .collect(),
    }
}

/// Client for launching calls on the voice provider.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    client: reqwest::Client,
    config: VoiceConfig,
}

impl VoiceClient {
    pub fn new(config: VoiceConfig) -> Result<Self, VoxbookError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(key) = config.private_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    VoxbookError::Config(format!("invalid voice private key header value: {e}"))
                })?,
            );
        }
        if let Some(key) = config.public_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                "x-public-key",
                HeaderValue::from_str(key).map_err(|e| {
                    VoxbookError::Config(format!("invalid voice public key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoxbookError::ExternalService {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, config })
    }

    fn team_for(&self, call_type: CallType) -> Option<&str> {
        match call_type {
            CallType::Outreach => self.config.outreach_team_id.as_deref(),
            CallType::Booking => self.config.booking_team_id.as_deref(),
            CallType::Unknown => None,
        }
    }

    fn backend_url(&self) -> &str {
        self.config.public_backend_url.trim_end_matches('/')
    }
}

#[async_trait]
impl PluginAdapter for VoiceClient {
    fn name(&self) -> &str {
        "vapi"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Voice
    }

    async fn health_check(&self) -> Result<HealthStatus, VoxbookError> {
        if self.is_configured() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("no private key configured".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), VoxbookError> {
        Ok(())
    }
}

#[async_trait]
impl VoiceProvider for VoiceClient {
    fn is_configured(&self) -> bool {
        self.config
            .private_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    async fn launch_call(&self, brief: &CallBrief) -> Result<(), VoxbookError> {
        if !self.is_configured() {
            return Err(VoxbookError::ExternalService {
                message: "voice provider is not configured".into(),
                source: None,
            });
        }

        let backend = self.backend_url();
        let request = LaunchRequest {
            session_id: &brief.session_id,
            call_type: brief.call_type,
            team_id: self.team_for(brief.call_type),
            server_url: format!("{backend}/api/calls/webhooks/voice"),
            metadata: LaunchMetadata {
                target_contact: brief.target_contact.as_deref(),
                objective: brief.objective.as_deref(),
                notes: brief.notes.as_deref(),
                venue_id: brief.venue_id.as_deref(),
            },
            assistant: assistant_for(brief, backend),
        };

        let url = format!("{}/calls", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VoxbookError::ExternalService {
                message: format!("call launch request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, session_id = %brief.session_id, "call launch response received");
        if status.is_success() {
            info!(session_id = %brief.session_id, "voice call launched");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(VoxbookError::ExternalService {
            message: format!("voice provider returned {status}: {body}"),
            source: None,
        })
    }
}

/// Launch `brief` on a detached task. Failures are logged and dropped.
pub fn dispatch_launch(provider: Arc<dyn VoiceProvider>, brief: CallBrief) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = provider.launch_call(&brief).await {
            warn!(session_id = %brief.session_id, error = %e, "voice call launch failed");
        }
    })
}
