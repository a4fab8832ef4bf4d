// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sandbox payment recording. Nothing here moves money.

use bigdecimal::BigDecimal;
use rusqlite::Connection;
use serde_json::{Map, Value};
use uuid::Uuid;
use voxbook_core::{PaymentProvider, PaymentStatus};
use voxbook_storage::models::{NewPayment, Payment};
use voxbook_storage::queries;

/// Reference handed out for sandbox payments, e.g. `sbx_3f2a...`.
pub fn sandbox_reference() -> String {
    format!("sbx_{}", Uuid::new_v4().simple())
}

/// Record a succeeded sandbox payment against `booking_id`.
pub fn record_sandbox_payment(
    conn: &Connection,
    booking_id: i64,
    amount: Option<BigDecimal>,
    currency: &str,
    source: &str,
) -> rusqlite::Result<Payment> {
    let mut extras = Map::new();
    extras.insert("source".into(), Value::String(source.to_string()));
    queries::payments::insert_payment(
        conn,
        &NewPayment {
            booking_id,
            provider: PaymentProvider::Sandbox,
            status: PaymentStatus::Succeeded,
            amount,
            currency: Some(currency.to_string()),
            sandbox_reference: Some(sandbox_reference()),
            extras,
        },
    )
}
