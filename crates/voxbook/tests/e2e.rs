// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for a complete booking call.
//!
//! Each test creates an isolated TestHarness with temp SQLite and a mock
//! voice provider. Tests are independent and order-insensitive.

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use voxbook_bus::{EventStream, SessionEvent};
use voxbook_core::{CallType, SnapshotState};
use voxbook_test_utils::TestHarness;

async fn post(harness: &TestHarness, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = harness.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn next_event(stream: &mut EventStream) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("event within timeout")
        .expect("stream open")
}

/// Skip events until one of `kind` arrives.
async fn next_of_kind(stream: &mut EventStream, kind: &str) -> SessionEvent {
    loop {
        let event = next_event(stream).await;
        if event.kind() == kind {
            return event;
        }
    }
}

// ---- Test 1: Full booking call ----

#[tokio::test]
async fn test_booking_call_lifecycle() {
    let harness = TestHarness::new().await.unwrap();
    let mut events = harness.bus.subscribe("s-e2e");

    let (status, _) = post(
        &harness,
        "/api/calls/launch",
        json!({"session_id": "s-e2e", "call_type": "booking", "target_contact": "+15550001"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for event in ["call.started", "call.in-progress"] {
        post(
            &harness,
            "/api/calls/webhooks/voice",
            json!({"event": event, "session_id": "s-e2e"}),
        )
        .await;
    }
    post(
        &harness,
        "/api/calls/webhooks/voice",
        json!({"event": "transcript", "sessionId": "s-e2e", "role": "user", "content": "A room for three at nine please"}),
    )
    .await;

    post(
        &harness,
        "/api/tools/customer",
        json!({"session_id": "s-e2e", "name": "Ada", "email": "ada@example.com"}),
    )
    .await;
    let (_, availability) = post(
        &harness,
        "/api/tools/availability",
        json!({"session_id": "s-e2e", "start_time": "2025-06-01T09:00:00Z", "attendee_count": 3}),
    )
    .await;
    assert!(
        availability["rooms"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["available"] == true)
    );

    let (status, booked) = post(
        &harness,
        "/api/tools/booking",
        json!({
            "session_id": "s-e2e",
            "room_id": "room-a",
            "start_time": "2025-06-01T09:00:00Z",
            "attendee_count": 3,
            "customer": {"name": "Ada", "email": "ada@example.com"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let booking_id = booked["booking_id"].as_i64().unwrap();

    post(
        &harness,
        "/api/calls/webhooks/voice",
        json!({"event": "call.completed", "session_id": "s-e2e", "transcript": "full transcript"}),
    )
    .await;

    // Events arrive in publish order.
    let kinds = [
        "status",
        "status",
        "transcript",
        "customer.captured",
        "availability",
        "booking.confirmed",
        "status",
    ];
    for expected in kinds {
        assert_eq!(next_event(&mut events).await.kind(), expected);
    }
    let SessionEvent::Summary { summary } = next_of_kind(&mut events, "summary").await else {
        unreachable!()
    };
    assert_eq!(
        summary.headline,
        format!("Booking {booking_id} confirmed for room room-a")
    );

    let record = harness.registry.get("s-e2e").unwrap();
    assert_eq!(record.call_type, CallType::Booking);
    assert_eq!(
        record.statuses,
        ["call.started", "call.in-progress", "call.completed"]
    );
    assert_eq!(record.booking_status.status, SnapshotState::Confirmed);
    assert_eq!(record.booking_status.key_token, booked["door_code"].as_str().map(String::from));
    assert_eq!(record.brief["customer"]["email"], "ada@example.com");
    assert!(record.summary.is_some());

    let logs = harness
        .storage
        .database()
        .unwrap()
        .read(|conn| voxbook_storage::queries::call_logs::for_session(conn, "s-e2e"))
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].booking_id, Some(booking_id));
    assert_eq!(logs[0].call_type.as_deref(), Some("booking"));

    let launched = harness.voice.wait_for_launches(1).await;
    assert_eq!(launched[0].target_contact.as_deref(), Some("+15550001"));
}

// ---- Test 2: Fan-out ----

#[tokio::test]
async fn test_two_subscribers_receive_every_event() {
    let harness = TestHarness::new().await.unwrap();
    let mut first = harness.bus.subscribe("s-fan");
    let mut second = harness.bus.subscribe("s-fan");

    for text in ["one", "two", "three"] {
        post(
            &harness,
            "/api/calls/webhooks/voice",
            json!({"event": "transcript", "session_id": "s-fan", "text": text}),
        )
        .await;
    }

    for stream in [&mut first, &mut second] {
        for expected in ["one", "two", "three"] {
            match next_event(stream).await {
                SessionEvent::Transcript { text, .. } => assert_eq!(text, expected),
                other => panic!("unexpected event {other:?}"),
            }
        }
    }
}

// ---- Test 3: Idempotent confirmation and door codes ----

#[tokio::test]
async fn test_repeated_confirmation_keeps_one_booking_and_code() {
    let harness = TestHarness::new().await.unwrap();
    let payload = json!({
        "preferences": {"date": "2025-06-01", "startTime": "14:00", "durationHours": 1.5, "attendees": 2},
        "roomId": "room-b"
    });

    let (_, first) = post(&harness, "/api/booking/s-dup/confirm", payload.clone()).await;
    let (_, second) = post(&harness, "/api/booking/s-dup/confirm", payload).await;
    assert_eq!(first["booking"]["id"], second["booking"]["id"]);
    assert_eq!(
        first["booking"]["door_access"]["door_code"],
        second["booking"]["door_access"]["door_code"]
    );
    assert_eq!(first["booking"]["start_time"], "2025-06-01T14:00:00Z");
    assert_eq!(first["booking"]["end_time"], "2025-06-01T15:30:00Z");

    let id = first["booking"]["id"].as_i64().unwrap();
    let (_, regenerated) = post(&harness, &format!("/api/booking/{id}/door-code"), json!({})).await;
    let door_rows = harness
        .storage
        .database()
        .unwrap()
        .read(move |conn| voxbook_storage::queries::door_access::for_booking(conn, id))
        .await
        .unwrap();
    assert_eq!(
        door_rows.map(|d| d.door_code),
        regenerated["booking"]["door_access"]["door_code"]
            .as_str()
            .map(String::from)
    );

    let bookings = harness.workflow.recent_bookings(10).await.unwrap();
    assert_eq!(bookings.len(), 1);
}

// ---- Test 4: Capacity-only rejection ----

#[tokio::test]
async fn test_capacity_is_the_only_reason_for_an_empty_small_room() {
    let harness = TestHarness::new().await.unwrap();
    let (_, report) = post(
        &harness,
        "/api/tools/availability",
        json!({"start_time": "2025-06-01T10:00:00Z", "duration_minutes": 60, "attendees": 6}),
    )
    .await;
    let room_a = report["rooms"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["room_id"] == "room-a")
        .unwrap()
        .clone();
    assert_eq!(room_a["available"], false);
    assert_eq!(room_a["reasons"], json!([voxbook_booking::availability::REASON_CAPACITY]));
}
