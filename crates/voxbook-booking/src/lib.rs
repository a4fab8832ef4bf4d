// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking logic for the Voxbook backend.
//!
//! Normalizes inbound booking payloads, evaluates room availability and
//! runs the confirm workflow (customer upsert, booking, sandbox payment and
//! door code) against storage, then reflects the outcome into the session
//! registry and the live event bus.

pub mod availability;
pub mod door;
pub mod payload;
pub mod payments;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{AvailabilityQuery, AvailabilityReport, AvailabilityRequest};
pub use door::DoorIssuer;
pub use payload::{BookingPayload, BookingRequest, CustomerInput};
pub use workflow::{BookingConfirmation, BookingWorkflow, MockPaymentRequest, SurveyInput, snapshot_of};
