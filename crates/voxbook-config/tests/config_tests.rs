// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading and diagnostics.

use std::io::Write;

use serial_test::serial;
use voxbook_config::diagnostic::ConfigError;
use voxbook_config::model::VoxbookConfig;
use voxbook_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"
frontend_origins = ["https://console.example.com"]

[storage]
database_path = "/tmp/voxbook-test.db"
wal_mode = false

[voice]
base_url = "https://voice.example.com"
private_key = "priv"
public_key = "pub"
outreach_team_id = "team-out"
booking_team_id = "team-book"
public_backend_url = "https://api.example.com"
webhook_secret = "s3cret"
request_timeout_secs = 5

[booking]
default_venue_id = "venue-harbor"
default_currency = "EUR"
default_duration_minutes = 45
door_code_length = 6
door_code_expiry_hours = 3
door_instructions = "Side door."

[events]
heartbeat_interval_secs = 5
backlog_capacity = 16
backlog_ttl_secs = 120

[venues]
data_path = "/srv/voxbook/venues.json"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.frontend_origins, vec!["https://console.example.com"]);
    assert!(!config.storage.wal_mode);
    assert_eq!(config.voice.private_key.as_deref(), Some("priv"));
    assert_eq!(config.voice.booking_team_id.as_deref(), Some("team-book"));
    assert_eq!(config.voice.webhook_secret.as_deref(), Some("s3cret"));
    assert_eq!(config.booking.default_venue_id, "venue-harbor");
    assert_eq!(config.booking.default_duration_minutes, 45);
    assert_eq!(config.booking.door_code_length, 6);
    assert_eq!(config.events.backlog_capacity, 16);
    assert_eq!(config.events.backlog_ttl_secs, 120);
    assert_eq!(config.venues.data_path, "/srv/voxbook/venues.json");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.log_level, "info");
    assert!(config.storage.wal_mode);
    assert!(config.voice.private_key.is_none());
    assert!(config.voice.webhook_secret.is_none());
    assert_eq!(config.booking.default_currency, "USD");
    assert_eq!(config.booking.default_duration_minutes, 60);
    assert_eq!(config.booking.door_code_length, 4);
    assert_eq!(config.booking.door_code_expiry_hours, 2);
    assert_eq!(config.events.heartbeat_interval_secs, 15);
}

#[test]
fn unknown_top_level_section_rejected() {
    let err = load_config_from_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section should be rejected");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "got: {err_str}"
    );
}

#[test]
fn unknown_key_gets_suggestion_and_valid_keys() {
    let toml = r#"
[voice]
privte_key = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "privte_key"
                && suggestion.as_deref() == Some("private_key")
                && valid_keys.contains("public_backend_url")
        })
    });
    assert!(found, "expected UnknownKey for privte_key, got: {errors:?}");
}

#[test]
fn wrong_type_reported() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_successful_parse() {
    let toml = r#"
[booking]
door_code_length = 2
"#;

    let errors = load_and_validate_str(toml).expect_err("short door code should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("door_code_length"))
    ));
}

#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: VoxbookConfig = Figment::new()
        .merge(Serialized::defaults(VoxbookConfig::default()))
        .merge(Toml::string("[voice]\nprivate_key = \"from-toml\"\n"))
        .merge(("voice.private_key", "from-env"))
        .extract()
        .expect("override should merge");

    assert_eq!(config.voice.private_key.as_deref(), Some("from-env"));
}

#[test]
#[serial]
fn env_var_maps_to_section_key() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[booking]\ndefault_currency = \"EUR\"").unwrap();

    // SAFETY: serialized with every other env-touching test in this binary.
    unsafe {
        std::env::set_var("VOXBOOK_BOOKING_DOOR_CODE_LENGTH", "8");
        std::env::set_var("VOXBOOK_VOICE_WEBHOOK_SECRET", "from-env");
    }
    let result = load_and_validate_path(file.path());
    unsafe {
        std::env::remove_var("VOXBOOK_BOOKING_DOOR_CODE_LENGTH");
        std::env::remove_var("VOXBOOK_VOICE_WEBHOOK_SECRET");
    }

    let config = result.expect("env overrides should validate");
    assert_eq!(config.booking.default_currency, "EUR");
    assert_eq!(config.booking.door_code_length, 8);
    assert_eq!(config.voice.webhook_secret.as_deref(), Some("from-env"));
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "host, port, log_level, frontend_origins".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `port`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("prot"));
}
