// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Door-code generation and issuance.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::rngs::OsRng;
use rusqlite::Connection;
use serde_json::{Map, Value};
use voxbook_config::model::BookingConfig;
use voxbook_storage::models::{Booking, DoorAccess, DoorCodeIssue};
use voxbook_storage::queries;

/// Issues numeric door codes from the OS random source.
#[derive(Debug, Clone)]
pub struct DoorIssuer {
    code_length: usize,
    expiry: Duration,
    instructions: String,
}

impl DoorIssuer {
    pub fn new(code_length: usize, expiry: Duration, instructions: impl Into<String>) -> Self {
        Self {
            code_length,
            expiry,
            instructions: instructions.into(),
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(
            config.door_code_length,
            Duration::hours(config.door_code_expiry_hours),
            config.door_instructions.clone(),
        )
    }

    /// A fresh code of `code_length` decimal digits.
    pub fn generate_code(&self) -> String {
        let mut rng = OsRng;
        (0..self.code_length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    /// Generate a code for `booking` and store it, replacing any previous
    /// one. The code expires `expiry` after the booking ends (or starts, or
    /// now when the booking has no window).
    pub fn issue(
        &self,
        conn: &Connection,
        booking: &Booking,
        reason: &str,
    ) -> rusqlite::Result<DoorAccess> {
        let issued_at = Utc::now();
        let anchor = booking.end_time.or(booking.start_time).unwrap_or(issued_at);
        let mut context = Map::new();
        context.insert("reason".into(), Value::String(reason.to_string()));
        if let Some(room) = &booking.room_id {
            context.insert("room_id".into(), Value::String(room.clone()));
        }

        queries::door_access::upsert_door_code(
            conn,
            &DoorCodeIssue {
                booking_id: booking.id,
                door_code: self.generate_code(),
                instructions: Some(self.instructions.clone()),
                issued_at,
                expires_at: Some(anchor + self.expiry),
                context,
            },
        )
    }
}
