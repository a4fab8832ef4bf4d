// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only survey responses.

use rusqlite::{Connection, Row, params};

use crate::columns::{get_json, get_map, get_ts, json, now};
use crate::models::{NewSurvey, SurveyResponse};

const COLUMNS: &str = "id, booking_id, rating, comments, transcript, action_items, context, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<SurveyResponse> {
    Ok(SurveyResponse {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        rating: row.get(2)?,
        comments: row.get(3)?,
        transcript: row.get(4)?,
        action_items: get_json(row, 5)?,
        context: get_map(row, 6)?,
        created_at: get_ts(row, 7)?,
    })
}

pub fn insert_survey(conn: &Connection, survey: &NewSurvey) -> rusqlite::Result<SurveyResponse> {
    conn.execute(
        "INSERT INTO survey_responses (booking_id, rating, comments, transcript, action_items,
                                       context, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            survey.booking_id,
            survey.rating,
            survey.comments,
            survey.transcript,
            json(&survey.action_items),
            json(&survey.context),
            now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM survey_responses WHERE id = ?1"),
        params![id],
        from_row,
    )
}

pub fn for_booking(conn: &Connection, booking_id: i64) -> rusqlite::Result<Vec<SurveyResponse>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM survey_responses WHERE booking_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![booking_id], from_row)?;
    rows.collect()
}
