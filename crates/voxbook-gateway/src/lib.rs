// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Voxbook booking backend.
//!
//! REST endpoints for the console and the voice agent's tools, the provider
//! webhook, and per-session live event streams over SSE and WebSocket.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod stream;
pub mod tools;

pub use auth::WebhookAuth;
pub use error::ApiError;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
