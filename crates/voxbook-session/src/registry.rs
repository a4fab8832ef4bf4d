// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide table of live call sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use voxbook_core::{BookingSnapshot, CallType, SessionRecord, SessionSummary, TranscriptEntry};

/// Session records keyed by session id, behind one lock.
///
/// Mutators other than [`upsert`](Self::upsert) create a record with call
/// type [`CallType::Unknown`] when the session has not been seen yet.
/// Records are never evicted.
#[derive(Default)]
pub struct SessionRegistry {
    records: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, SessionRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_record<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionRecord) -> R) -> R {
        let mut table = self.table();
        let record = table
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(session_id, CallType::Unknown));
        f(record)
    }

    /// Insert or wholesale replace a record.
    pub fn upsert(&self, record: SessionRecord) {
        self.table().insert(record.session_id.clone(), record);
    }

    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.table().get(session_id).cloned()
    }

    /// Snapshot of every record, in no particular order.
    pub fn all(&self) -> Vec<SessionRecord> {
        self.table().values().cloned().collect()
    }

    pub fn append_transcript(&self, session_id: &str, entry: TranscriptEntry) {
        self.with_record(session_id, |r| r.transcript.push(entry));
    }

    pub fn update_summary(&self, session_id: &str, summary: SessionSummary) {
        self.with_record(session_id, |r| r.summary = Some(summary));
    }

    pub fn update_booking_status(&self, session_id: &str, snapshot: BookingSnapshot) {
        self.with_record(session_id, |r| r.booking_status = snapshot);
    }

    /// Append a provider call status (`call.started`, `call.completed`, ...).
    pub fn record_status(&self, session_id: &str, status: impl Into<String>) {
        let status = status.into();
        self.with_record(session_id, |r| r.statuses.push(status));
    }

    /// Merge `fields` into the brief object stored under `key`, returning the
    /// merged object.
    pub fn merge_brief(
        &self,
        session_id: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Map<String, Value> {
        self.with_record(session_id, |r| {
            let slot = r
                .brief
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match slot {
                Value::Object(existing) => {
                    existing.extend(fields);
                    existing.clone()
                }
                other => {
                    *other = Value::Object(fields.clone());
                    fields
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}
