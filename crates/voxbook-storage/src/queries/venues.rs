// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venue and room queries.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::columns::{get_json, get_map, json};
use crate::models::{Room, Venue};

const ROOM_COLUMNS: &str = "id, venue_id, label, capacity, amenities, availability";

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        label: row.get(2)?,
        capacity: row.get(3)?,
        amenities: get_json(row, 4)?,
        availability: get_map(row, 5)?,
    })
}

/// Rooms of `venue_id` in seed order.
pub fn rooms_for_venue(conn: &Connection, venue_id: &str) -> rusqlite::Result<Vec<Room>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE venue_id = ?1 ORDER BY position, id"
    ))?;
    let rows = stmt.query_map(params![venue_id], room_from_row)?;
    rows.collect()
}

pub fn get_room(conn: &Connection, room_id: &str) -> rusqlite::Result<Option<Room>> {
    conn.query_row(
        &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
        params![room_id],
        room_from_row,
    )
    .optional()
}

/// A venue with its rooms.
pub fn get_venue(conn: &Connection, venue_id: &str) -> rusqlite::Result<Option<Venue>> {
    let venue = conn
        .query_row(
            "SELECT id, name, address, contact, policies FROM venues WHERE id = ?1",
            params![venue_id],
            |row| {
                Ok(Venue {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    contact: row.get(3)?,
                    policies: get_map(row, 4)?,
                    rooms: Vec::new(),
                })
            },
        )
        .optional()?;

    match venue {
        Some(mut venue) => {
            venue.rooms = rooms_for_venue(conn, &venue.id)?;
            Ok(Some(venue))
        }
        None => Ok(None),
    }
}

/// Every venue ordered by name, rooms included.
pub fn list_venues(conn: &Connection) -> rusqlite::Result<Vec<Venue>> {
    let ids: Vec<String> = {
        let mut stmt = conn.prepare("SELECT id FROM venues ORDER BY name, id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<_>>()?
    };
    let mut venues = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(venue) = get_venue(conn, &id)? {
            venues.push(venue);
        }
    }
    Ok(venues)
}

/// Insert a venue and its rooms unless a venue with the same id exists.
///
/// Returns `true` when the venue was inserted.
pub fn insert_venue_if_absent(conn: &Connection, venue: &Venue) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO venues (id, name, address, contact, policies)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO NOTHING",
        params![
            venue.id,
            venue.name,
            venue.address,
            venue.contact,
            json(&venue.policies),
        ],
    )?;
    if inserted == 0 {
        return Ok(false);
    }

    let mut stmt = conn.prepare(
        "INSERT INTO rooms (id, venue_id, label, capacity, amenities, availability, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (position, room) in venue.rooms.iter().enumerate() {
        stmt.execute(params![
            room.id,
            venue.id,
            room.label,
            room.capacity,
            json(&room.amenities),
            json(&room.availability),
            position as i64,
        ])?;
    }
    Ok(true)
}
