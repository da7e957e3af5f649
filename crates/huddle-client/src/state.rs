//! Application state shared by the synchronization service, the typing
//! tracker and the views.
//!
//! The [`AppState`] struct is wrapped in `Arc<Mutex<>>` and handed to every
//! component that reads or writes it. No component holds the lock across
//! an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use huddle_shared::ChatId;
use huddle_store::views::{ChannelDetailsView, ChatCellView};
use huddle_store::{ChatsState, EntityStore};

pub type SharedState = Arc<Mutex<AppState>>;

/// Central client state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Normalized chats, users and messages.
    pub entities: EntityStore,

    /// List order, fetch states, member lists, typing and selection.
    pub chats: ChatsState,
}

impl AppState {
    /// Create a new, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Rows of the direct-message list.
    pub fn direct_cells(&self) -> Vec<ChatCellView> {
        self.cells(&self.chats.direct_ids)
    }

    /// Rows of the channel list.
    pub fn channel_cells(&self) -> Vec<ChatCellView> {
        self.cells(&self.chats.channel_ids)
    }

    fn cells(&self, ids: &[ChatId]) -> Vec<ChatCellView> {
        ids.iter()
            .filter_map(|id| ChatCellView::build(&self.entities, &self.chats, id))
            .collect()
    }

    pub fn channel_details(&self, chat_id: &ChatId) -> Option<ChannelDetailsView> {
        ChannelDetailsView::build(&self.entities, &self.chats, chat_id)
    }
}

/// Lock the shared state. Writes are merge-only, so the state behind a
/// poisoned lock is still consistent and is used as is.
pub fn lock(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("State lock poisoned, recovering");
        poisoned.into_inner()
    })
}
