// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error rather than a silently ignored setting.

use serde::{Deserialize, Serialize};

/// Top-level Voxbook configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VoxbookConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Hosted voice-agent provider.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Booking workflow defaults.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Live event stream settings.
    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub venues: VenuesConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default = "default_frontend_origins")]
    pub frontend_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            frontend_origins: default_frontend_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frontend_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

/// SQLite storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("voxbook").join("voxbook.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "voxbook.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Voice provider credentials and routing.
///
/// Without `private_key` the provider is treated as unconfigured and call
/// launches are refused.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    #[serde(default = "default_voice_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub private_key: Option<String>,

    #[serde(default)]
    pub public_key: Option<String>,

    /// Assistant team used for outreach calls.
    #[serde(default)]
    pub outreach_team_id: Option<String>,

    /// Assistant team used for booking calls.
    #[serde(default)]
    pub booking_team_id: Option<String>,

    /// Externally reachable base URL of this backend, used to build the
    /// webhook and tool URLs handed to the provider.
    #[serde(default = "default_public_backend_url")]
    pub public_backend_url: String,

    /// Shared secret expected in the `x-webhook-secret` header. `None`
    /// accepts unsigned webhooks.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_voice_base_url(),
            private_key: None,
            public_key: None,
            outreach_team_id: None,
            booking_team_id: None,
            public_backend_url: default_public_backend_url(),
            webhook_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_voice_base_url() -> String {
    "https://api.vapi.ai".to_string()
}

fn default_public_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Defaults applied while normalizing booking payloads and issuing codes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    #[serde(default = "default_venue_id")]
    pub default_venue_id: String,

    /// ISO 4217 code applied to payments that omit one.
    #[serde(default = "default_currency")]
    pub default_currency: String,

    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,

    #[serde(default = "default_door_code_length")]
    pub door_code_length: usize,

    #[serde(default = "default_door_code_expiry_hours")]
    pub door_code_expiry_hours: i64,

    #[serde(default = "default_door_instructions")]
    pub door_instructions: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_venue_id: default_venue_id(),
            default_currency: default_currency(),
            default_duration_minutes: default_duration_minutes(),
            door_code_length: default_door_code_length(),
            door_code_expiry_hours: default_door_code_expiry_hours(),
            door_instructions: default_door_instructions(),
        }
    }
}

fn default_venue_id() -> String {
    "venue-downtown".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_duration_minutes() -> i64 {
    60
}

fn default_door_code_length() -> usize {
    4
}

fn default_door_code_expiry_hours() -> i64 {
    2
}

fn default_door_instructions() -> String {
    "Use the provided code at the main entrance keypad.".to_string()
}

/// Live event stream settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Idle seconds before a subscriber receives a heartbeat.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Events held per session while nobody is subscribed.
    #[serde(default = "default_backlog_capacity")]
    pub backlog_capacity: usize,

    /// Seconds a session without subscribers keeps its backlog before the
    /// periodic sweep discards it.
    #[serde(default = "default_backlog_ttl_secs")]
    pub backlog_ttl_secs: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            backlog_capacity: default_backlog_capacity(),
            backlog_ttl_secs: default_backlog_ttl_secs(),
        }
    }
}

fn default_heartbeat_interval_secs() -> u64 {
    15
}

fn default_backlog_capacity() -> usize {
    256
}

fn default_backlog_ttl_secs() -> u64 {
    300
}

/// Venue seed data location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VenuesConfig {
    #[serde(default = "default_venues_data_path")]
    pub data_path: String,
}

impl Default for VenuesConfig {
    fn default() -> Self {
        Self {
            data_path: default_venues_data_path(),
        }
    }
}

fn default_venues_data_path() -> String {
    "data/venues.json".to_string()
}
