// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`VoxbookError`] onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use voxbook_core::VoxbookError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler error rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub VoxbookError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            VoxbookError::Validation { .. } => StatusCode::BAD_REQUEST,
            VoxbookError::NotFound { .. } => StatusCode::NOT_FOUND,
            VoxbookError::Conflict(_) => StatusCode::CONFLICT,
            VoxbookError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            VoxbookError::Storage { .. } | VoxbookError::Config(_) | VoxbookError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<VoxbookError> for ApiError {
    fn from(e: VoxbookError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(VoxbookError::validation("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Plain status plus message, for answers that are not domain errors.
pub fn status_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
