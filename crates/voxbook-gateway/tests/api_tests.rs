// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the gateway through `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use voxbook_test_utils::{MockVoiceProvider, TestHarness};

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking_body(session: &str, room: &str, start: &str) -> Value {
    json!({
        "session_id": session,
        "room_id": room,
        "start_time": start,
        "duration_minutes": 60,
        "attendee_count": 2,
        "customer": {"name": "Ada", "email": "ada@example.com"}
    })
}

// ---- Health and metadata ----

#[tokio::test]
async fn health_reports_ok() {
    let harness = TestHarness::new().await.unwrap();
    let (status, body) = send(&harness.router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn venues_listed_and_fetched() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let (status, body) = send(&app, get("/api/metadata/venues")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "venue-downtown");
    assert_eq!(body[0]["rooms"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/api/metadata/venues/venue-downtown")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Downtown Hub");

    let (status, body) = send(&app, get("/api/metadata/venues/venue-nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("venue-nowhere"));
}

#[tokio::test]
async fn unknown_session_is_404() {
    let harness = TestHarness::new().await.unwrap();
    let (status, _) = send(&harness.router(), get("/api/metadata/sessions/s-missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---- Call launch ----

#[tokio::test]
async fn launch_queues_call_and_registers_session() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let (status, body) = send(
        &app,
        post(
            "/api/calls/launch",
            json!({"session_id": "s-1", "call_type": "booking", "objective": "book a room"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"session_id": "s-1", "status": "queued"}));

    let launched = tokio::time::timeout(Duration::from_secs(5), harness.voice.wait_for_launches(1))
        .await
        .unwrap();
    assert_eq!(launched[0].objective.as_deref(), Some("book a room"));

    let (status, record) = send(&app, get("/api/metadata/sessions/s-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["call_type"], "booking");
    assert_eq!(record["brief"]["objective"], "book a room");
}

#[tokio::test]
async fn launch_without_credentials_is_503() {
    let harness = TestHarness::builder()
        .with_voice(MockVoiceProvider::unconfigured())
        .build()
        .await
        .unwrap();
    let (status, body) = send(
        &harness.router(),
        post("/api/calls/launch", json!({"session_id": "s-1", "call_type": "outreach"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
    assert!(harness.registry.get("s-1").is_none());
}

#[tokio::test]
async fn launch_rejects_bad_briefs() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let (status, _) = send(
        &app,
        post("/api/calls/launch", json!({"session_id": " ", "call_type": "booking"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post("/api/calls/launch", json!({"session_id": "s-1", "call_type": "unknown"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post("/api/calls/launch", json!({"call_type": "booking"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---- Webhooks ----

#[tokio::test]
async fn webhook_transcript_is_accepted() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let (status, body) = send(
        &app,
        post(
            "/api/calls/webhooks/voice",
            json!({"event": "transcript", "session_id": "s-1", "role": "user", "text": "hello"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    let record = harness.registry.get("s-1").unwrap();
    assert_eq!(record.transcript.len(), 1);
    assert_eq!(record.transcript[0].text, "hello");
}

#[tokio::test]
async fn webhook_garbage_is_ignored_not_rejected() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let request = Request::post("/api/calls/webhooks/voice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");

    let (_, body) = send(
        &app,
        post("/api/calls/webhooks/voice", json!({"event": "speech.mystery", "session_id": "s-1"})),
    )
    .await;
    assert_eq!(body["status"], "ignored");
    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn webhook_secret_enforced() {
    let harness = TestHarness::builder()
        .with_webhook_secret("hush")
        .build()
        .await
        .unwrap();
    let app = harness.router();
    let event = json!({"event": "call.started", "session_id": "s-1"});

    let (status, _) = send(&app, post("/api/calls/webhooks/voice", event.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut request = post("/api/calls/webhooks/voice", event);
    request
        .headers_mut()
        .insert("x-webhook-secret", "hush".parse().unwrap());
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert_eq!(harness.registry.get("s-1").unwrap().statuses, ["call.started"]);
}

// ---- Agent tools ----

#[tokio::test]
async fn customer_tool_merges_into_brief() {
    let harness = TestHarness::new().await.unwrap();
    let (status, body) = send(
        &harness.router(),
        post(
            "/api/tools/customer",
            json!({"session_id": "s-1", "customer": {"name": "Ada", "phoneNumber": "+1555"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stored");

    let brief = harness.registry.get("s-1").unwrap().brief;
    assert_eq!(brief["customer"]["name"], "Ada");
    assert_eq!(brief["customer"]["phone_number"], "+1555");
}

#[tokio::test]
async fn customer_tool_requires_session() {
    let harness = TestHarness::new().await.unwrap();
    let (status, body) = send(
        &harness.router(),
        post("/api/tools/customer", json!({"name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("session_id"));
}

#[tokio::test]
async fn availability_tool_reports_rooms() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();
    send(
        &app,
        post("/api/tools/booking", booking_body("s-1", "room-a", "2025-06-01T09:00:00Z")),
    )
    .await;

    let (status, body) = send(
        &app,
        post(
            "/api/tools/availability",
            json!({"start_time": "2025-06-01T09:30:00Z", "duration_minutes": 30, "attendees": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["venue_id"], "venue-downtown");
    let rooms = body["rooms"].as_array().unwrap();
    let room_a = rooms.iter().find(|r| r["room_id"] == "room-a").unwrap();
    let room_b = rooms.iter().find(|r| r["room_id"] == "room-b").unwrap();
    assert_eq!(room_a["available"], false);
    assert_eq!(room_b["available"], true);
}

#[tokio::test]
async fn booking_tool_returns_code_and_is_idempotent() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();
    let body = booking_body("s-1", "room-a", "2025-06-01T09:00:00Z");

    let (status, first) = send(&app, post("/api/tools/booking", body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "CONFIRMED");
    assert_eq!(first["door_code"].as_str().unwrap().len(), 4);

    let (_, second) = send(&app, post("/api/tools/booking", body)).await;
    assert_eq!(second["booking_id"], first["booking_id"]);
    assert_eq!(second["door_code"], first["door_code"]);

    let (_, recent) = send(&app, get("/api/booking/recent")).await;
    assert_eq!(recent["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn survey_and_payment_tools() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();
    let (_, booked) = send(
        &app,
        post("/api/tools/booking", booking_body("s-1", "room-b", "2025-06-01T11:00:00Z")),
    )
    .await;

    let (status, body) = send(
        &app,
        post("/api/tools/survey", json!({"session_id": "s-1", "rating": 5, "comments": "great"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "logged");
    assert!(body["survey_id"].is_i64());

    let (status, _) = send(
        &app,
        post("/api/tools/survey", json!({"session_id": "s-1", "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post("/api/tools/payment", json!({"session_id": "s-1", "amount": "20.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["payment"]["booking_id"], booked["booking_id"]);
    assert!(
        body["payment"]["sandbox_reference"]
            .as_str()
            .unwrap()
            .starts_with("sbx_")
    );

    let (_, recent) = send(&app, get("/api/payments/recent?limit=5")).await;
    assert_eq!(recent["payments"].as_array().unwrap().len(), 1);
}

// ---- Front-end booking endpoints ----

#[tokio::test]
async fn confirm_with_preferences_payload() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();

    let (status, body) = send(
        &app,
        post(
            "/api/booking/s-7/confirm",
            json!({
                "preferences": {"date": "2025-06-01", "startTime": "14:00", "durationHours": 1.5, "attendees": 3},
                "roomId": "room-b",
                "customer": {"name": "Grace", "email": "grace@example.com"},
                "payment": {"amount": 30}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let booking = &body["booking"];
    assert_eq!(booking["session_id"], "s-7");
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["duration_minutes"], 90);
    assert_eq!(booking["room"]["id"], "room-b");
    assert_eq!(booking["customer"]["email"], "grace@example.com");
    assert!(booking["door_access"]["door_code"].is_string());
    assert_eq!(booking["payment"]["currency"], "USD");
}

#[tokio::test]
async fn confirm_unknown_room_is_404() {
    let harness = TestHarness::new().await.unwrap();
    let (status, _) = send(
        &harness.router(),
        post(
            "/api/booking/s-1/confirm",
            json!({"room_id": "room-z", "start_time": "2025-06-01T09:00:00Z"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn confirm_rejects_malformed_json() {
    let harness = TestHarness::new().await.unwrap();
    let request = Request::post("/api/booking/s-1/confirm")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[1, 2"))
        .unwrap();
    let (status, body) = send(&harness.router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn door_code_regeneration() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();
    let (_, booked) = send(
        &app,
        post("/api/tools/booking", booking_body("s-1", "room-a", "2025-06-01T15:00:00Z")),
    )
    .await;
    let id = booked["booking_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        post(&format!("/api/booking/{id}/door-code"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["id"], id);
    assert_eq!(body["booking"]["door_access"]["context"]["reason"], "regenerated");

    let (status, _) = send(&app, post("/api/booking/99999/door-code", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post("/api/booking/abc/door-code", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---- Live streams ----

#[tokio::test]
async fn sse_stream_starts_with_listening_then_backlog() {
    let harness = TestHarness::new().await.unwrap();
    let app = harness.router();
    send(
        &app,
        post(
            "/api/calls/webhooks/voice",
            json!({"event": "transcript", "session_id": "s-live", "text": "queued before connect"}),
        ),
    )
    .await;

    let response = app.oneshot(get("/api/events/s-live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();
    while !seen.contains("queued before connect") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        seen.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    let listening = seen.find("\"listening\"").unwrap();
    let transcript = seen.find("queued before connect").unwrap();
    assert!(listening < transcript);
}
