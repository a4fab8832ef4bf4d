// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice provider integration for Voxbook.
//!
//! [`VoiceClient`] launches outbound calls on the hosted voice-agent
//! platform. [`WebhookIngestor`] turns the platform's webhook callbacks into
//! session updates and live events.

pub mod client;
pub mod webhook;

pub use client::{VoiceClient, dispatch_launch};
pub use webhook::{IngestOutcome, WebhookEvent, WebhookIngestor};
