// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test fixtures.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;
use voxbook_core::BookingStatus;

use crate::Database;
use crate::models::{NewBooking, Room, Venue};
use crate::queries::venues::insert_venue_if_absent;

pub fn sample_venue() -> Venue {
    let room = |id: &str, capacity| Room {
        id: id.to_string(),
        venue_id: "venue-downtown".into(),
        label: id.to_uppercase(),
        capacity,
        amenities: vec!["whiteboard".into()],
        availability: Map::new(),
    };
    Venue {
        id: "venue-downtown".into(),
        name: "Downtown Hub".into(),
        address: Some("1 Main St".into()),
        contact: None,
        policies: Map::new(),
        rooms: vec![room("room-b", 8), room("room-a", 4)],
    }
}

pub async fn seeded_db() -> Database {
    let db = Database::open_in_memory().await.unwrap();
    db.transaction(|tx| Ok(insert_venue_if_absent(tx, &sample_venue())?))
        .await
        .unwrap();
    db
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
}

pub fn booking(session: &str, room: &str, start: DateTime<Utc>, minutes: i64) -> NewBooking {
    NewBooking {
        session_id: Some(session.to_string()),
        customer_id: None,
        venue_id: "venue-downtown".into(),
        room_id: Some(room.to_string()),
        status: BookingStatus::Confirmed,
        start_time: Some(start),
        end_time: Some(start + chrono::Duration::minutes(minutes)),
        duration_minutes: Some(minutes),
        attendee_count: Some(2),
        notes: None,
        details: Map::new(),
    }
}
