// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret check for provider webhooks.
//!
//! When a secret is configured, webhook requests must carry it in the
//! `x-webhook-secret` header. Without one, webhooks are accepted unsigned.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

pub const SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Clone, Default)]
pub struct WebhookAuth {
    pub secret: Option<String>,
}

impl std::fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn webhook_auth_middleware(
    State(auth): State<WebhookAuth>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.secret.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    match presented {
        Some(secret) if constant_time_eq(secret.as_bytes(), expected.as_bytes()) => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!("webhook rejected: missing or wrong secret");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let auth = WebhookAuth {
            secret: Some("hunter2".into()),
        };
        let debug_output = format!("{auth:?}");
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("[redacted]"));
    }

    #[test]
    fn comparison() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
