// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool endpoints called by the voice agent mid-call.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Map, Value, json};
use voxbook_booking::{
    AvailabilityQuery, AvailabilityReport, BookingPayload, CustomerInput, MockPaymentRequest,
    SurveyInput,
};
use voxbook_core::VoxbookError;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Contact details arrive either nested under `customer` or flat.
fn customer_from(payload: &Map<String, Value>) -> Result<CustomerInput, VoxbookError> {
    let source = match payload.get("customer") {
        Some(Value::Object(nested)) => Value::Object(nested.clone()),
        _ => Value::Object(payload.clone()),
    };
    serde_json::from_value(source)
        .map_err(|e| VoxbookError::validation("customer", e.to_string()))
}

/// POST /api/tools/customer
pub async fn customer(
    State(state): State<GatewayState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    let session_id = payload
        .get("session_id")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| VoxbookError::validation("session_id", "is required"))?
        .to_string();
    let customer = customer_from(&payload)?;
    state.workflow.capture_customer(&session_id, customer);
    Ok(Json(json!({"status": "stored"})))
}

/// POST /api/tools/availability
pub async fn availability(
    State(state): State<GatewayState>,
    body: Result<Json<AvailabilityQuery>, JsonRejection>,
) -> Result<Json<AvailabilityReport>, ApiError> {
    let Json(query) = body?;
    let request = query.normalize(state.workflow.config())?;
    Ok(Json(state.workflow.check_availability(request).await?))
}

/// POST /api/tools/booking
pub async fn booking(
    State(state): State<GatewayState>,
    body: Result<Json<BookingPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    let confirmation = state.workflow.confirm_payload(payload, None).await?;
    Ok(Json(json!({
        "booking_id": confirmation.booking_id,
        "door_code": confirmation.door_code,
        "status": confirmation.status.to_string(),
    })))
}

/// POST /api/tools/survey
pub async fn survey(
    State(state): State<GatewayState>,
    body: Result<Json<SurveyInput>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(survey) = body?;
    let stored = state.workflow.log_survey(survey).await?;
    let mut response = json!({"status": "logged"});
    if let Some(row) = stored {
        response["survey_id"] = json!(row.id);
    }
    Ok(Json(response))
}

/// POST /api/tools/payment
pub async fn payment(
    State(state): State<GatewayState>,
    body: Result<Json<MockPaymentRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    let payment = state.workflow.record_mock_payment(request).await?;
    Ok(Json(json!({"status": "succeeded", "payment": payment})))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn customer_nested_block_wins() {
        let c = customer_from(&map(json!({
            "session_id": "s",
            "name": "flat",
            "customer": {"name": "nested"}
        })))
        .unwrap();
        assert_eq!(c.name.as_deref(), Some("nested"));
    }

    #[test]
    fn customer_flat_fields() {
        let c = customer_from(&map(json!({
            "session_id": "s",
            "email": "a@b.c",
            "phone_number": "+1"
        })))
        .unwrap();
        assert_eq!(c.email.as_deref(), Some("a@b.c"));
        assert_eq!(c.phone_number.as_deref(), Some("+1"));
    }
}
