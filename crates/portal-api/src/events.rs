//! Live chat push hub.
//!
//! One broadcast channel per chat session. Subscribers (SSE streams) get
//! every message pushed for their session; a slow or dropped subscriber
//! only loses its own events. This is the single push channel for chat —
//! consumers are not expected to poll.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use database::ChatMessage;
use tokio::sync::broadcast;
use tracing::debug;

/// Per-session broadcast fan-out for chat messages.
#[derive(Clone)]
pub struct ChatHub {
    sessions: Arc<Mutex<HashMap<String, broadcast::Sender<ChatMessage>>>>,
}

impl ChatHub {
    /// Buffered messages per subscriber before a lagging one starts losing.
    const CHANNEL_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a session's message stream.
    pub fn subscribe(&self, session_id: &str) -> broadcast::Receiver<ChatMessage> {
        let mut sessions = self.sessions.lock().expect("chat hub lock poisoned");
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(Self::CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Push a message to a session's subscribers, if any.
    pub fn publish(&self, message: &ChatMessage) {
        let mut sessions = self.sessions.lock().expect("chat hub lock poisoned");
        if let Some(sender) = sessions.get(&message.session_id) {
            match sender.send(message.clone()) {
                Ok(count) => {
                    debug!(session = %message.session_id, subscribers = count, "Pushed chat message");
                }
                Err(_) => {
                    // Last subscriber is gone; drop the channel.
                    sessions.remove(&message.session_id);
                }
            }
        }
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::SenderType;

    fn message(session_id: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id: "m".to_string(),
            session_id: session_id.to_string(),
            sender_type: SenderType::User,
            message: text.to_string(),
            created_at: database::now_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_message() {
        let hub = ChatHub::new();
        let mut rx = hub.subscribe("s1");

        hub.publish(&message("s1", "hello"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, "hello");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let hub = ChatHub::new();
        let mut rx_a = hub.subscribe("a");
        let _rx_b = hub.subscribe("b");

        hub.publish(&message("b", "for b only"));

        assert!(matches!(
            rx_a.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_no_op() {
        let hub = ChatHub::new();
        // No panic, nothing to deliver to.
        hub.publish(&message("ghost", "anyone there?"));
    }
}
