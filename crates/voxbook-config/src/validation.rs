// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::VoxbookConfig;

/// Allowed door-code lengths, inclusive.
pub const DOOR_CODE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=12;

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &VoxbookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.server.port == 0 {
        errors.push(ConfigError::validation("server.port must not be 0"));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let booking = &config.booking;
    if !DOOR_CODE_LENGTH_RANGE.contains(&booking.door_code_length) {
        errors.push(ConfigError::validation(format!(
            "booking.door_code_length must be between {} and {}, got {}",
            DOOR_CODE_LENGTH_RANGE.start(),
            DOOR_CODE_LENGTH_RANGE.end(),
            booking.door_code_length
        )));
    }

    if booking.default_duration_minutes <= 0 {
        errors.push(ConfigError::validation(format!(
            "booking.default_duration_minutes must be positive, got {}",
            booking.default_duration_minutes
        )));
    }

    if booking.door_code_expiry_hours < 0 {
        errors.push(ConfigError::validation(format!(
            "booking.door_code_expiry_hours must be non-negative, got {}",
            booking.door_code_expiry_hours
        )));
    }

    let currency = &booking.default_currency;
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(ConfigError::validation(format!(
            "booking.default_currency `{currency}` must be a three-letter code"
        )));
    }

    if booking.default_venue_id.trim().is_empty() {
        errors.push(ConfigError::validation(
            "booking.default_venue_id must not be empty",
        ));
    }

    if config.events.heartbeat_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "events.heartbeat_interval_secs must be greater than 0",
        ));
    }

    if config.events.backlog_ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "events.backlog_ttl_secs must be greater than 0",
        ));
    }

    if config.voice.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "voice.request_timeout_secs must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&VoxbookConfig::default()).is_ok());
    }

    #[test]
    fn door_code_length_out_of_range() {
        let mut config = VoxbookConfig::default();
        config.booking.door_code_length = 3;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "door_code_length"));

        config.booking.door_code_length = 13;
        assert!(validate_config(&config).is_err());

        config.booking.door_code_length = 12;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_backlog_ttl_rejected() {
        let mut config = VoxbookConfig::default();
        config.events.backlog_ttl_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "backlog_ttl_secs"));
    }

    #[test]
    fn zero_heartbeat_rejected() {
        let mut config = VoxbookConfig::default();
        config.events.heartbeat_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "heartbeat_interval_secs"));
    }

    #[test]
    fn bad_currency_rejected() {
        let mut config = VoxbookConfig::default();
        config.booking.default_currency = "US$".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "default_currency"));
    }

    #[test]
    fn collects_every_failure() {
        let mut config = VoxbookConfig::default();
        config.storage.database_path = " ".into();
        config.booking.default_duration_minutes = 0;
        config.server.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn host_with_invalid_characters_rejected() {
        let mut config = VoxbookConfig::default();
        config.server.host = "local host!".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }
}
