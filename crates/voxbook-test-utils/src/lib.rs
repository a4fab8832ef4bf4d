// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Voxbook integration tests.
//!
//! - [`TestHarness`] wires a temp SQLite database, the session registry,
//!   the event bus, the booking workflow and the gateway router.
//! - [`MockVoiceProvider`] records launched calls instead of dialing out.

pub mod harness;
pub mod mock_voice;

pub use harness::{TestHarness, sample_venue};
pub use mock_voice::MockVoiceProvider;
