// SPDX-License-Identifier: MIT

//! Lifecycle event fan-out: every hook invocation is mirrored
//! onto a broadcast channel as a line of XML, so a subscriber on the event
//! port sees the same lifecycle stream the hook scripts themselves observe.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 1024;

/// A fire-and-forget broadcaster of `<event type='...' session='...' />`
/// blobs. No durability, no ordering guarantee across subscribers — a lagged
/// receiver just misses old events, it never errors the publish side.
#[derive(Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<String>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _rx) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Publish one lifecycle event. Dropped silently if nobody is listening.
    pub fn publish(&self, hook: &str, cookie: &str) {
        let blob = format!(
            "<event type='{}' session='{}' />",
            xml_attr_escape(hook),
            xml_attr_escape(cookie)
        );
        let _ = self.sender.send(blob);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

fn xml_attr_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\'', "&apos;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
