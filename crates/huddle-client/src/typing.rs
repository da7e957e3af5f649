//! Typing indicators with a fixed expiry.
//!
//! A signal marks the user as typing in the chat and schedules removal after
//! the configured timeout. Signals for a user already shown as typing are
//! dropped and do not extend the window.

use std::time::Duration;

use tracing::trace;

use huddle_shared::{ChatId, UserId};

use crate::events::{EventSink, StoreEvent};
use crate::state::{lock, SharedState};

#[derive(Clone)]
pub struct TypingTracker {
    state: SharedState,
    events: EventSink,
    timeout: Duration,
}

impl TypingTracker {
    pub fn new(state: SharedState, events: EventSink, timeout: Duration) -> Self {
        Self {
            state,
            events,
            timeout,
        }
    }

    /// Record a typing signal. Returns `false` when the user was already
    /// listed, in which case the running expiry is left untouched.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn signal_typing(&self, user_id: &UserId, chat_id: &ChatId) -> bool {
        if !lock(&self.state).chats.set_typing(chat_id, user_id) {
            trace!(chat_id = %chat_id, user_id = %user_id, "Already typing");
            return false;
        }
        self.events.emit(StoreEvent::TypingChanged {
            chat_id: chat_id.clone(),
        });

        let tracker = self.clone();
        let user_id = user_id.clone();
        let chat_id = chat_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(tracker.timeout).await;
            if lock(&tracker.state).chats.unset_typing(&chat_id, &user_id) {
                trace!(chat_id = %chat_id, user_id = %user_id, "Typing expired");
                tracker
                    .events
                    .emit(StoreEvent::TypingChanged { chat_id });
            }
        });

        true
    }

    pub fn typing_users(&self, chat_id: &ChatId) -> Vec<UserId> {
        lock(&self.state).chats.typing_users(chat_id).to_vec()
    }
}
