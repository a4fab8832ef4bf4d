// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking queries, overlap scans and the joined booking view.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use voxbook_core::{BookingStatus, RoomRef, VenueRef};

use crate::columns::{get_enum, get_map, get_opt_ts, get_ts, json, now, opt_ts, ts};
use crate::models::{Booking, BookingView, NewBooking};
use crate::queries::{customers, door_access, payments, venues};

const COLUMNS: &str = "id, session_id, customer_id, venue_id, room_id, status, start_time, \
                       end_time, duration_minutes, attendee_count, notes, details, created_at, \
                       updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        session_id: row.get(1)?,
        customer_id: row.get(2)?,
        venue_id: row.get(3)?,
        room_id: row.get(4)?,
        status: get_enum(row, 5)?,
        start_time: get_opt_ts(row, 6)?,
        end_time: get_opt_ts(row, 7)?,
        duration_minutes: row.get(8)?,
        attendee_count: row.get(9)?,
        notes: row.get(10)?,
        details: get_map(row, 11)?,
        created_at: get_ts(row, 12)?,
        updated_at: get_ts(row, 13)?,
    })
}

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> rusqlite::Result<Booking> {
    let stamp = now();
    conn.execute(
        "INSERT INTO bookings (session_id, customer_id, venue_id, room_id, status, start_time,
                               end_time, duration_minutes, attendee_count, notes, details,
                               created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        params![
            booking.session_id,
            booking.customer_id,
            booking.venue_id,
            booking.room_id,
            booking.status.to_string(),
            opt_ts(booking.start_time.as_ref()),
            opt_ts(booking.end_time.as_ref()),
            booking.duration_minutes,
            booking.attendee_count,
            booking.notes,
            json(&booking.details),
            stamp,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_booking(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get_booking(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

/// Id of the booking this session already holds for `room_id` at `start`.
///
/// Bookings without a room match `room_id = None`.
pub fn find_duplicate(
    conn: &Connection,
    session_id: &str,
    room_id: Option<&str>,
    start: &DateTime<Utc>,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM bookings
         WHERE session_id = ?1 AND COALESCE(room_id, '') = ?2 AND start_time = ?3",
        params![session_id, room_id.unwrap_or(""), ts(start)],
        |row| row.get(0),
    )
    .optional()
}

/// Id of the session's newest booking.
pub fn latest_for_session(conn: &Connection, session_id: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM bookings WHERE session_id = ?1 ORDER BY id DESC LIMIT 1",
        params![session_id],
        |row| row.get(0),
    )
    .optional()
}

/// Number of live bookings in `room_id` overlapping `[start, end)`.
///
/// Intervals are half-open, so a booking ending exactly at `start` does not
/// count. Cancelled bookings and bookings without a window are ignored.
pub fn count_overlapping(
    conn: &Connection,
    room_id: &str,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE room_id = ?1
           AND status != ?2
           AND start_time IS NOT NULL AND end_time IS NOT NULL
           AND start_time < ?3 AND end_time > ?4",
        params![
            room_id,
            BookingStatus::Cancelled.to_string(),
            ts(end),
            ts(start)
        ],
        |row| row.get(0),
    )
}

/// Most recent bookings by start time, newest first.
pub fn recent_bookings(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM bookings
         ORDER BY start_time IS NULL, start_time DESC, id DESC
         LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], from_row)?;
    rows.collect()
}

/// Join a booking with its customer, venue, room, latest payment and door code.
pub fn view(conn: &Connection, booking: Booking) -> rusqlite::Result<BookingView> {
    let customer = match booking.customer_id {
        Some(id) => customers::get_customer(conn, id)?,
        None => None,
    };
    let venue_name: String = conn
        .query_row(
            "SELECT name FROM venues WHERE id = ?1",
            params![booking.venue_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or_else(|| booking.venue_id.clone());
    let room = match booking.room_id.as_deref() {
        Some(room_id) => venues::get_room(conn, room_id)?.map(|r| RoomRef::from(&r)),
        None => None,
    };

    Ok(BookingView {
        id: booking.id,
        session_id: booking.session_id,
        status: booking.status,
        customer,
        venue: VenueRef {
            id: booking.venue_id,
            name: venue_name,
        },
        room,
        start_time: booking.start_time,
        end_time: booking.end_time,
        duration_minutes: booking.duration_minutes,
        attendee_count: booking.attendee_count,
        notes: booking.notes,
        details: booking.details,
        payment: payments::latest_for_booking(conn, booking.id)?,
        door_access: door_access::for_booking(conn, booking.id)?,
    })
}

pub fn get_view(conn: &Connection, id: i64) -> rusqlite::Result<Option<BookingView>> {
    get_booking(conn, id)?.map(|b| view(conn, b)).transpose()
}

pub fn recent_views(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<BookingView>> {
    recent_bookings(conn, limit)?
        .into_iter()
        .map(|b| view(conn, b))
        .collect()
}
