// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Door-access codes, one live row per booking.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::columns::{get_map, get_opt_ts, get_ts, json, opt_ts, ts};
use crate::models::{DoorAccess, DoorCodeIssue};

const COLUMNS: &str = "id, booking_id, door_code, instructions, issued_at, expires_at, context";

fn from_row(row: &Row<'_>) -> rusqlite::Result<DoorAccess> {
    Ok(DoorAccess {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        door_code: row.get(2)?,
        instructions: row.get(3)?,
        issued_at: get_ts(row, 4)?,
        expires_at: get_opt_ts(row, 5)?,
        context: get_map(row, 6)?,
    })
}

/// Insert or replace the booking's door code. The last issue wins.
pub fn upsert_door_code(conn: &Connection, issue: &DoorCodeIssue) -> rusqlite::Result<DoorAccess> {
    conn.execute(
        "INSERT INTO door_access_events (booking_id, door_code, instructions, issued_at, expires_at, context)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(booking_id) DO UPDATE SET
             door_code = excluded.door_code,
             instructions = excluded.instructions,
             issued_at = excluded.issued_at,
             expires_at = excluded.expires_at,
             context = excluded.context",
        params![
            issue.booking_id,
            issue.door_code,
            issue.instructions,
            ts(&issue.issued_at),
            opt_ts(issue.expires_at.as_ref()),
            json(&issue.context),
        ],
    )?;
    for_booking(conn, issue.booking_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn for_booking(conn: &Connection, booking_id: i64) -> rusqlite::Result<Option<DoorAccess>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM door_access_events WHERE booking_id = ?1"),
        params![booking_id],
        from_row,
    )
    .optional()
}
