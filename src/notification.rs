//! In-process contact event fan-out.
//!
//! Callers that want live updates (an embedding UI, a websocket bridge)
//! subscribe to the hub and receive every event published after they joined.
//! Publishing with no subscribers is not an error.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

pub const CONTACT_ADDED: &str = "contact_added";

/// One pushed event: `{type, data, timestamp}`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
    pub timestamp: String,
}

impl ContactEvent {
    pub fn new(kind: &str, data: serde_json::Value) -> Self {
        Self {
            kind: kind.to_string(),
            data,
            timestamp: now_rfc3339(),
        }
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct EventHub {
    sender: broadcast::Sender<ContactEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContactEvent> {
        self.sender.subscribe()
    }

    /// Live subscriber count, reported by the health check.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Send `event` to every subscriber. Returns how many received it.
    pub fn publish(&self, event: ContactEvent) -> usize {
        let kind = event.kind.clone();
        match self.sender.send(event) {
            Ok(delivered) => {
                log::debug!("Published {} to {} subscriber(s)", kind, delivered);
                delivered
            }
            Err(_) => {
                log::debug!("Published {} with no subscribers", kind);
                0
            }
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
