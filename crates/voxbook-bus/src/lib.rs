// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session live event bus.
//!
//! Every subscriber of a session owns an unbounded queue that `publish`
//! feeds, so all subscribers see every event in publish order. Events
//! published while nobody listens wait in a bounded backlog that the next
//! subscriber drains first. Subscriber streams yield a heartbeat after an
//! idle interval; dropping the stream ends the subscription.

pub mod events;

use std::collections::VecDeque;
use std::time::Duration;

use dashmap::DashMap;
use futures::stream::{self, BoxStream};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

pub use events::SessionEvent;

/// Stream of events for one subscriber. Never ends on its own.
pub type EventStream = BoxStream<'static, SessionEvent>;

struct Channel {
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
    backlog: VecDeque<SessionEvent>,
    last_activity: Instant,
}

impl Channel {
    fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            backlog: VecDeque::new(),
            last_activity: Instant::now(),
        }
    }
}

/// Session-keyed publish/subscribe hub.
pub struct EventBus {
    channels: DashMap<String, Channel>,
    heartbeat_interval: Duration,
    backlog_capacity: usize,
}

impl EventBus {
    pub fn new(heartbeat_interval: Duration, backlog_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            heartbeat_interval,
            backlog_capacity,
        }
    }

    /// Deliver `event` to every live subscriber of `session_id`.
    ///
    /// Never blocks. Subscribers whose stream was dropped are pruned here.
    /// With no live subscriber the event goes to the session backlog,
    /// evicting the oldest entry when full.
    pub fn publish(&self, session_id: &str, event: SessionEvent) {
        let mut channel = self
            .channels
            .entry(session_id.to_string())
            .or_insert_with(Channel::new);
        channel.last_activity = Instant::now();
        channel
            .subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());

        if !channel.subscribers.is_empty() {
            debug!(
                session_id,
                kind = event.kind(),
                subscribers = channel.subscribers.len(),
                "event published"
            );
            return;
        }

        if self.backlog_capacity == 0 {
            return;
        }
        if channel.backlog.len() >= self.backlog_capacity {
            channel.backlog.pop_front();
            warn!(session_id, "event backlog full, dropping oldest event");
        }
        channel.backlog.push_back(event);
    }

    /// Attach a new subscriber to `session_id`.
    ///
    /// The stream first yields any backlogged events, then every event
    /// published from now on. After `heartbeat_interval` without an event it
    /// yields [`SessionEvent::Heartbeat`].
    pub fn subscribe(&self, session_id: &str) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut channel = self
                .channels
                .entry(session_id.to_string())
                .or_insert_with(Channel::new);
            channel.last_activity = Instant::now();
            for event in channel.backlog.drain(..) {
                let _ = tx.send(event);
            }
            channel.subscribers.push(tx);
        }
        debug!(session_id, "subscriber attached");

        let interval = self.heartbeat_interval;
        let session_id = session_id.to_string();
        Box::pin(stream::unfold(rx, move |mut rx| {
            let session_id = session_id.clone();
            async move {
                match tokio::time::timeout(interval, rx.recv()).await {
                    Ok(Some(event)) => Some((event, rx)),
                    Ok(None) => None,
                    Err(_) => Some((SessionEvent::Heartbeat { session_id }, rx)),
                }
            }
        }))
    }

    /// Live subscribers currently attached to `session_id`.
    pub fn subscriber_count(&self, session_id: &str) -> usize {
        self.channels
            .get(session_id)
            .map(|c| c.subscribers.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    /// Sessions currently tracked by the bus.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop closed subscribers and forget sessions without a live subscriber
    /// that have nothing to deliver or saw no activity for `max_idle`.
    /// Backlogs of forgotten sessions are discarded. Returns how many
    /// sessions were forgotten.
    pub fn prune(&self, max_idle: Duration) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, channel| {
            channel.subscribers.retain(|tx| !tx.is_closed());
            !channel.subscribers.is_empty()
                || (!channel.backlog.is_empty() && channel.last_activity.elapsed() < max_idle)
        });
        let removed = before.saturating_sub(self.channels.len());
        if removed > 0 {
            debug!(removed, "idle event channels pruned");
        }
        removed
    }
}
