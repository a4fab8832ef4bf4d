// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only call audit log.

use rusqlite::{Connection, Row, params};

use crate::columns::{get_json, get_ts, json, now};
use crate::models::{CallLog, NewCallLog};

const COLUMNS: &str = "id, booking_id, session_id, call_type, payload, transcript, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<CallLog> {
    Ok(CallLog {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        session_id: row.get(2)?,
        call_type: row.get(3)?,
        payload: get_json(row, 4)?,
        transcript: row.get(5)?,
        created_at: get_ts(row, 6)?,
    })
}

pub fn insert_call_log(conn: &Connection, log: &NewCallLog) -> rusqlite::Result<CallLog> {
    conn.execute(
        "INSERT INTO call_logs (booking_id, session_id, call_type, payload, transcript, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.booking_id,
            log.session_id,
            log.call_type,
            json(&log.payload),
            log.transcript,
            now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM call_logs WHERE id = ?1"),
        params![id],
        from_row,
    )
}

pub fn for_session(conn: &Connection, session_id: &str) -> rusqlite::Result<Vec<CallLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM call_logs WHERE session_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![session_id], from_row)?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json as j;

    #[tokio::test]
    async fn logs_without_booking_are_kept() {
        let db = Database::open_in_memory().await.unwrap();
        let logs = db
            .transaction(|tx| {
                insert_call_log(
                    tx,
                    &NewCallLog {
                        session_id: Some("s-1".into()),
                        call_type: Some("outreach".into()),
                        payload: j!({"event": "call.completed"}),
                        ..Default::default()
                    },
                )?;
                Ok(for_session(tx, "s-1")?)
            })
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].booking_id, None);
        assert_eq!(logs[0].payload["event"], "call.completed");
    }
}
