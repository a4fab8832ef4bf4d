// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Voxbook booking backend.

use thiserror::Error;

/// The primary error type used across all Voxbook crates.
///
/// The gateway maps each variant to an HTTP status class, so new variants
/// must be added there too.
#[derive(Debug, Error)]
pub enum VoxbookError {
    /// A required field is missing or malformed.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A referenced venue, room, booking or session does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The voice provider (or another remote service) failed.
    #[error("external service error: {message}")]
    ExternalService {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (connection, query failure, transaction rollback).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VoxbookError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns true for errors caused by the caller (4xx class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Conflict(_)
        )
    }
}
