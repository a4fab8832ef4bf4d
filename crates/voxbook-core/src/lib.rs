// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Voxbook booking backend.
//!
//! Holds the error type, the domain records shared between crates and the
//! adapter traits implemented by the storage and voice backends.

pub mod booking;
pub mod error;
pub mod traits;
pub mod types;

pub use booking::{
    Booking, BookingStatus, BookingView, CallLog, Customer, DoorAccess, Payment, PaymentProvider,
    PaymentStatus, Room, RoomAvailability, RoomRef, SurveyResponse, Venue, VenueRef,
};
pub use error::VoxbookError;
pub use types::{
    AdapterType, BookingSnapshot, CallBrief, CallType, HealthStatus, SessionRecord,
    SessionSummary, SnapshotState, TranscriptEntry,
};

pub use traits::{PluginAdapter, StorageAdapter, VoiceProvider};
