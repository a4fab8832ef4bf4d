// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment rows. Amounts are stored as decimal text with two places.

use bigdecimal::{BigDecimal, RoundingMode};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::columns::{get_decimal, get_enum, get_map, get_ts, json, now};
use crate::models::{NewPayment, Payment};

const COLUMNS: &str =
    "id, booking_id, provider, status, amount, currency, sandbox_reference, extras, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        provider: get_enum(row, 2)?,
        status: get_enum(row, 3)?,
        amount: get_decimal(row, 4)?,
        currency: row.get(5)?,
        sandbox_reference: row.get(6)?,
        extras: get_map(row, 7)?,
        created_at: get_ts(row, 8)?,
    })
}

/// Canonical two-place form of a payment amount.
pub fn to_cents_scale(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

pub fn insert_payment(conn: &Connection, payment: &NewPayment) -> rusqlite::Result<Payment> {
    let amount = payment.amount.as_ref().map(to_cents_scale);
    conn.execute(
        "INSERT INTO payments (booking_id, provider, status, amount, currency, sandbox_reference,
                               extras, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            payment.booking_id,
            payment.provider.to_string(),
            payment.status.to_string(),
            amount.as_ref().map(|a| a.to_string()),
            payment.currency,
            payment.sandbox_reference,
            json(&payment.extras),
            now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM payments WHERE id = ?1"),
        params![id],
        from_row,
    )
}

pub fn latest_for_booking(conn: &Connection, booking_id: i64) -> rusqlite::Result<Option<Payment>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM payments WHERE booking_id = ?1 ORDER BY id DESC LIMIT 1"
        ),
        params![booking_id],
        from_row,
    )
    .optional()
}

/// Newest payments first.
pub fn recent_payments(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM payments ORDER BY id DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], from_row)?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, booking, seeded_db};
    use crate::queries::bookings::insert_booking;
    use serde_json::Map;
    use std::str::FromStr;
    use voxbook_core::{PaymentProvider, PaymentStatus};

    #[tokio::test]
    async fn amount_round_trips_at_two_places() {
        let db = seeded_db().await;
        let payment = db
            .transaction(|tx| {
                let b = insert_booking(tx, &booking("s-1", "room-a", at(14, 0), 60))?;
                Ok(insert_payment(
                    tx,
                    &NewPayment {
                        booking_id: b.id,
                        provider: PaymentProvider::Sandbox,
                        status: PaymentStatus::Succeeded,
                        amount: Some(BigDecimal::from_str("49.5").unwrap()),
                        currency: Some("USD".into()),
                        sandbox_reference: Some("sbx_1".into()),
                        extras: Map::new(),
                    },
                )?)
            })
            .await
            .unwrap();
        assert_eq!(payment.amount.unwrap().to_string(), "49.50");
        assert_eq!(payment.provider, PaymentProvider::Sandbox);

        let recent = db.read(|conn| recent_payments(conn, 5)).await.unwrap();
        assert_eq!(recent.len(), 1);
    }
}
