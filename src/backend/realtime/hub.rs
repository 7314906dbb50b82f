/**
 * Topic Hub
 *
 * Maintains, for each topic string, the set of currently subscribed
 * connections, and fans published envelopes out to them.
 *
 * # Delivery Semantics
 *
 * Delivery is best-effort per connection: a subscriber whose channel is
 * gone is logged, pruned and skipped, and never surfaces an error to the
 * publisher. There is no replay; a connection only sees envelopes
 * published while it is subscribed. Within one topic, envelopes reach
 * each subscriber in publish-call order.
 *
 * # Locking
 *
 * One mutex guards the whole registry. `publish` snapshots the topic's
 * subscriber list under the lock and performs the actual sends after
 * releasing it, so one slow or dead connection can never stall the
 * registry or the publisher. The sends themselves are unbounded-channel
 * writes; the per-connection writer task does the socket I/O.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::backend::realtime::envelope::WsOutbound;

/// Server-wide topic for JOIN/LEAVE announcements.
pub const SYSTEM_TOPIC: &str = "system";

type SubscriberMap = HashMap<Uuid, UnboundedSender<WsOutbound>>;

#[derive(Default)]
pub struct Hub {
    topics: Mutex<HashMap<String, SubscriberMap>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fan-out topic for a chat.
    pub fn topic_for_chat(chat_id: &str) -> String {
        format!("chat.{chat_id}")
    }

    /// Add a connection to a topic's subscriber set. Idempotent: a second
    /// subscribe by the same connection replaces its sender.
    pub fn subscribe(&self, topic: &str, connection_id: Uuid, sender: UnboundedSender<WsOutbound>) {
        let mut topics = self.topics.lock().unwrap();
        topics
            .entry(topic.to_string())
            .or_default()
            .insert(connection_id, sender);
        tracing::debug!("[Realtime] connection {connection_id} subscribed to {topic}");
    }

    /// Remove a connection from one topic.
    pub fn unsubscribe(&self, topic: &str, connection_id: Uuid) {
        let mut topics = self.topics.lock().unwrap();
        if let Some(subscribers) = topics.get_mut(topic) {
            subscribers.remove(&connection_id);
            if subscribers.is_empty() {
                topics.remove(topic);
            }
        }
        tracing::debug!("[Realtime] connection {connection_id} unsubscribed from {topic}");
    }

    /// Remove a connection from every topic. Called on every connection
    /// teardown path so no stale subscriber reference survives.
    pub fn unsubscribe_all(&self, connection_id: Uuid) {
        let mut topics = self.topics.lock().unwrap();
        for subscribers in topics.values_mut() {
            subscribers.remove(&connection_id);
        }
        topics.retain(|_, subscribers| !subscribers.is_empty());
        tracing::debug!("[Realtime] connection {connection_id} unsubscribed from all topics");
    }

    /// Deliver an envelope to every current subscriber of a topic.
    ///
    /// Returns the number of subscribers that accepted the envelope.
    pub fn publish(&self, topic: &str, envelope: &WsOutbound) -> usize {
        // Snapshot under the lock, deliver outside it.
        let targets: Vec<(Uuid, UnboundedSender<WsOutbound>)> = {
            let topics = self.topics.lock().unwrap();
            match topics.get(topic) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|(id, tx)| (*id, tx.clone()))
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (connection_id, tx) in targets {
            if tx.send(envelope.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(
                    "[Realtime] dropping dead subscriber {connection_id} on {topic}"
                );
                dead.push(connection_id);
            }
        }

        if !dead.is_empty() {
            let mut topics = self.topics.lock().unwrap();
            if let Some(subscribers) = topics.get_mut(topic) {
                for connection_id in dead {
                    subscribers.remove(&connection_id);
                }
                if subscribers.is_empty() {
                    topics.remove(topic);
                }
            }
        }

        tracing::debug!("[Realtime] published to {topic}: {delivered} subscribers");
        delivered
    }

    /// Current subscriber count of a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .unwrap()
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}
