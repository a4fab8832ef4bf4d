// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;
use voxbook_core::Room;

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
}

pub fn room(id: &str, capacity: i64) -> Room {
    Room {
        id: id.to_string(),
        venue_id: "venue-downtown".into(),
        label: id.to_uppercase(),
        capacity,
        amenities: Vec::new(),
        availability: Map::new(),
    }
}
