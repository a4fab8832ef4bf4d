// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column encodings shared by the query modules.
//!
//! Timestamps are RFC 3339 UTC strings at second precision, JSON bags are
//! text, enums use their `Display` form and decimals their canonical string.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub fn ts(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn opt_ts(value: Option<&DateTime<Utc>>) -> Option<String> {
    value.map(ts)
}

pub fn now() -> String {
    ts(&Utc::now())
}

pub fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn conversion_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn get_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

pub fn get_opt_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_err(idx, e))
    })
    .transpose()
}

pub fn get_json<T: DeserializeOwned + Default>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) if !s.is_empty() => serde_json::from_str(&s).map_err(|e| conversion_err(idx, e)),
        _ => Ok(T::default()),
    }
}

pub fn get_map(row: &Row<'_>, idx: usize) -> rusqlite::Result<Map<String, Value>> {
    get_json(row, idx)
}

pub fn get_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = strum::ParseError>,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw).map_err(|e| conversion_err(idx, e))
}

pub fn get_decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<BigDecimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| BigDecimal::from_str(&s).map_err(|e| conversion_err(idx, e)))
        .transpose()
}
