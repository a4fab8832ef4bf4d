// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live session event streams over SSE and WebSocket.
//!
//! Both transports open with a `listening` status event, then relay every
//! bus event for the session as a JSON object.

use std::convert::Infallible;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{
        Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::{self, Stream, StreamExt};
use voxbook_bus::{EventStream, SessionEvent};

use crate::server::GatewayState;

/// Subscribe first, then prepend the `listening` event, so nothing
/// published in between is lost.
fn session_stream(state: &GatewayState, session_id: String) -> EventStream {
    let events = state.bus.subscribe(&session_id);
    stream::once(async move { SessionEvent::listening(session_id) })
        .chain(events)
        .boxed()
}

fn encode(event: &SessionEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, kind = event.kind(), "dropping unserializable event");
            None
        }
    }
}

/// GET /api/events/{session_id}
pub async fn sse_handler(
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(session_id = %session_id, "SSE subscriber connected");
    let events = session_stream(&state, session_id)
        .filter_map(|event| async move { encode(&event).map(|json| Ok(Event::default().data(json))) });
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// GET /ws/events/{session_id}
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
    Path(session_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Forward events until either side goes away. Client messages are read
/// only to notice the close.
async fn handle_socket(mut socket: WebSocket, state: GatewayState, session_id: String) {
    tracing::debug!(session_id = %session_id, "WebSocket subscriber connected");
    let mut events = session_stream(&state, session_id.clone());

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let Some(json) = encode(&event) else { continue };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    tracing::debug!(session_id = %session_id, "WebSocket subscriber disconnected");
}
