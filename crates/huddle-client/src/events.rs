use huddle_shared::{ChatId, MessageId};
use tokio::sync::broadcast;

/// Capacity of the store-change channel. Slow subscribers skip ahead.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notification that part of the shared state changed and views derived
/// from it should be recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A conversation-list page (or an opened chat) was merged.
    ChatsUpdated,
    LastMessageLoaded { chat_id: ChatId, message_id: MessageId },
    MembersUpdated { chat_id: ChatId },
    ChatInfoLoaded { chat_id: ChatId },
    TypingChanged { chat_id: ChatId },
    CurrentChatChanged { chat_id: ChatId },
    /// A fetch for this resource failed; loading indicators should stop.
    FetchFailed { resource: &'static str, chat_id: Option<ChatId> },
}

/// Sending half, cloned into every component that mutates state.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscriber is normal (headless use).
    pub fn emit(&self, event: StoreEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No store-event subscriber");
        }
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}
