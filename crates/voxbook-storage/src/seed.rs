// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venue seed file parsing.
//!
//! The seed file is a JSON array of venues, each with nested rooms. Only
//! `id` is required; names and labels fall back to the id.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use voxbook_core::{Room, Venue, VoxbookError};

#[derive(Debug, Deserialize)]
struct VenueSeed {
    id: Value,
    name: Option<String>,
    address: Option<String>,
    contact: Option<String>,
    #[serde(default)]
    policies: Map<String, Value>,
    #[serde(default)]
    rooms: Vec<RoomSeed>,
}

#[derive(Debug, Deserialize)]
struct RoomSeed {
    id: Value,
    label: Option<String>,
    #[serde(default)]
    capacity: i64,
    #[serde(default)]
    amenities: Vec<String>,
    #[serde(default)]
    availability: Map<String, Value>,
}

/// Ids may be written as strings or numbers.
fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Capitalize each dash- or underscore-separated word: `venue-downtown` → `Venue Downtown`.
fn title_case(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse seed JSON into venues.
pub fn parse_venues(content: &str) -> Result<Vec<Venue>, VoxbookError> {
    let seeds: Vec<VenueSeed> = serde_json::from_str(content)
        .map_err(|e| VoxbookError::validation("venues", e.to_string()))?;

    Ok(seeds
        .into_iter()
        .map(|seed| {
            let venue_id = id_string(&seed.id);
            let rooms = seed
                .rooms
                .into_iter()
                .map(|room| {
                    let id = id_string(&room.id);
                    Room {
                        label: room.label.unwrap_or_else(|| id.clone()),
                        id,
                        venue_id: venue_id.clone(),
                        capacity: room.capacity.max(0),
                        amenities: room.amenities,
                        availability: room.availability,
                    }
                })
                .collect();
            Venue {
                name: seed.name.unwrap_or_else(|| title_case(&venue_id)),
                id: venue_id,
                address: seed.address,
                contact: seed.contact,
                policies: seed.policies,
                rooms,
            }
        })
        .collect())
}

/// Read and parse a seed file. A missing file is an error.
pub fn load_venues_file(path: &Path) -> Result<Vec<Venue>, VoxbookError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        VoxbookError::not_found("venue seed file", format!("{}: {e}", path.display()))
    })?;
    parse_venues(&content)
}
