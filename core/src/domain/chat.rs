//! Chat between a student and a teacher.
//!
//! Messages are always read from the REST API. The real-time channel only
//! says "something changed in this conversation": each event bumps the
//! conversation's [`MessageFeed`] generation and the UI refetches.

use log::{debug, warn};
use serde_json::Value;
use shared::{ChatMessage, SendMessageRequest};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::io::rest::{ApiError, BrainBridgeApi};

pub const NEW_MESSAGE_EVENT: &str = "new-message";

/// Channel shared by two participants, the same whichever side opens it
pub fn conversation_channel(a: i64, b: i64) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("chat-{}-{}", low, high)
}

pub type EventHandler = Rc<dyn Fn(&Value)>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealtimeError {
    #[error("Failed to subscribe to {channel}: {reason}")]
    Subscribe { channel: String, reason: String },
    #[error("Real-time service unavailable: {0}")]
    Unavailable(String),
}

/// Pub/sub service delivering conversation events (Pusher in the browser)
pub trait RealtimeChannel {
    fn subscribe(
        &self,
        channel: &str,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), RealtimeError>;

    fn unsubscribe(&self, channel: &str);
}

/// Change counter for one conversation's message list
#[derive(Debug, Clone, Default)]
pub struct MessageFeed {
    generation: Arc<AtomicU64>,
}

impl MessageFeed {
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Mark the cached messages stale
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// An open conversation; close it through [`ChatService::close`]
#[derive(Debug, Clone)]
pub struct Conversation {
    pub other_user_id: i64,
    pub channel: String,
    pub feed: MessageFeed,
    /// False when the real-time subscription failed; the list then only
    /// refreshes on the student's own sends
    pub live: bool,
}

#[derive(Clone)]
pub struct ChatService {
    api: Arc<dyn BrainBridgeApi>,
    realtime: Rc<dyn RealtimeChannel>,
}

impl ChatService {
    pub fn new(api: Arc<dyn BrainBridgeApi>, realtime: Rc<dyn RealtimeChannel>) -> Self {
        Self { api, realtime }
    }

    /// Subscribe to the conversation between `me` and `other`.
    /// `on_change` runs after every real-time event, once the feed is
    /// invalidated. Subscription failures are logged, never returned.
    pub fn open<F>(&self, me: i64, other: i64, on_change: F) -> Conversation
    where
        F: Fn() + 'static,
    {
        let channel = conversation_channel(me, other);
        let feed = MessageFeed::default();

        let handler_feed = feed.clone();
        let handler_channel = channel.clone();
        let handler: EventHandler = Rc::new(move |_payload: &Value| {
            debug!("New message event on {}", handler_channel);
            handler_feed.invalidate();
            on_change();
        });

        let live = match self.realtime.subscribe(&channel, NEW_MESSAGE_EVENT, handler) {
            Ok(()) => true,
            Err(err) => {
                warn!("Real-time updates disabled for {}: {}", channel, err);
                false
            }
        };

        Conversation {
            other_user_id: other,
            channel,
            feed,
            live,
        }
    }

    pub fn close(&self, conversation: &Conversation) {
        if conversation.live {
            self.realtime.unsubscribe(&conversation.channel);
        }
    }

    pub async fn load_messages(
        &self,
        conversation: &Conversation,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        self.api.get_messages(conversation.other_user_id).await
    }

    /// Post a message, then invalidate the feed so the list refetches
    pub async fn send(
        &self,
        conversation: &Conversation,
        body: &str,
    ) -> Result<ChatMessage, ChatError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request = SendMessageRequest {
            receiver_id: conversation.other_user_id,
            body: body.to_string(),
        };
        let message = self.api.send_message(&request).await?;
        conversation.feed.invalidate();
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FakeRealtime};
    use std::cell::Cell;

    #[test]
    fn test_channel_is_order_independent() {
        assert_eq!(conversation_channel(4, 9), "chat-4-9");
        assert_eq!(conversation_channel(9, 4), "chat-4-9");
        assert_eq!(conversation_channel(3, 3), "chat-3-3");
    }

    #[test]
    fn test_event_invalidates_feed_and_notifies() {
        let realtime = Rc::new(FakeRealtime::default());
        let service = ChatService::new(Arc::new(FakeApi::new()), realtime.clone());

        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        let conversation = service.open(1, 2, move || counter.set(counter.get() + 1));

        assert!(conversation.live);
        assert_eq!(conversation.feed.generation(), 0);

        realtime.emit("chat-1-2", NEW_MESSAGE_EVENT, serde_json::json!({"id": 5}));
        realtime.emit("chat-1-2", "typing", serde_json::json!({}));

        assert_eq!(conversation.feed.generation(), 1);
        assert_eq!(notified.get(), 1);

        service.close(&conversation);
        assert!(!realtime.is_subscribed("chat-1-2"));
        realtime.emit("chat-1-2", NEW_MESSAGE_EVENT, serde_json::json!({}));
        assert_eq!(conversation.feed.generation(), 1);
    }

    #[test]
    fn test_subscription_failure_is_not_surfaced() {
        let realtime = Rc::new(FakeRealtime::failing());
        let service = ChatService::new(Arc::new(FakeApi::new()), realtime.clone());

        let conversation = service.open(1, 2, || {});
        assert!(!conversation.live);

        service.close(&conversation);
        assert!(realtime.unsubscribed.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_send_invalidates_and_refetch_sees_message() {
        let api = Arc::new(FakeApi::new());
        let service = ChatService::new(api.clone(), Rc::new(FakeRealtime::default()));
        let conversation = service.open(1, 2, || {});

        assert!(service.load_messages(&conversation).await.unwrap().is_empty());

        let sent = service.send(&conversation, "  Hello teacher  ").await.unwrap();
        assert_eq!(sent.body, "Hello teacher");
        assert_eq!(conversation.feed.generation(), 1);

        let messages = service.load_messages(&conversation).await.unwrap();
        assert_eq!(messages, vec![sent]);
        assert_eq!(api.message_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_locally() {
        let api = Arc::new(FakeApi::new());
        let service = ChatService::new(api.clone(), Rc::new(FakeRealtime::default()));
        let conversation = service.open(1, 2, || {});

        assert_eq!(service.send(&conversation, "   ").await, Err(ChatError::EmptyMessage));
        assert!(api.messages.lock().unwrap().is_empty());
        assert_eq!(conversation.feed.generation(), 0);
    }
}
