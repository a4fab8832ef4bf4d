// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer queries.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::columns::{get_map, json, now};
use crate::models::{Customer, NewCustomer};

const COLUMNS: &str = "id, external_id, name, email, phone_number, attributes";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        external_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        attributes: get_map(row, 5)?,
    })
}

pub fn get_customer(conn: &Connection, id: i64) -> rusqlite::Result<Option<Customer>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM customers WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<Customer>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM customers WHERE email = ?1"),
        params![email],
        from_row,
    )
    .optional()
}

pub fn insert_customer(conn: &Connection, customer: &NewCustomer) -> rusqlite::Result<Customer> {
    let stamp = now();
    conn.execute(
        "INSERT INTO customers (external_id, name, email, phone_number, attributes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            customer.external_id,
            customer.name,
            customer.email,
            customer.phone_number,
            json(&customer.attributes),
            stamp,
        ],
    )?;
    Ok(Customer {
        id: conn.last_insert_rowid(),
        external_id: customer.external_id.clone(),
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone_number: customer.phone_number.clone(),
        attributes: customer.attributes.clone(),
    })
}

/// Overwrite the mutable contact fields of an existing customer.
pub fn update_customer(conn: &Connection, customer: &Customer) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE customers
         SET external_id = ?2, name = ?3, email = ?4, phone_number = ?5, attributes = ?6,
             updated_at = ?7
         WHERE id = ?1",
        params![
            customer.id,
            customer.external_id,
            customer.name,
            customer.email,
            customer.phone_number,
            json(&customer.attributes),
            now(),
        ],
    )?;
    Ok(())
}
