//! Chat bookkeeping that is not an entity: list membership, fetch states,
//! member lists, typing sets and the current selection.

use std::collections::HashMap;

use huddle_shared::{ChatId, MessageId, UserId};
use serde::Serialize;

use crate::pagination::{LastMessageState, LoadState, PageState};

/// Paginated member list of one channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberList {
    pub ids: Vec<UserId>,
    pub state: PageState,
}

impl MemberList {
    /// Append a page, skipping ids already listed.
    pub fn extend(&mut self, members: impl IntoIterator<Item = UserId>) {
        for member in members {
            if !self.ids.contains(&member) {
                self.ids.push(member);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatsState {
    /// Pagination of the conversation list.
    pub list: PageState,
    /// Direct chats, in the order the service listed them.
    pub direct_ids: Vec<ChatId>,
    /// Channels and groups, in the order the service listed them.
    pub channel_ids: Vec<ChatId>,

    pub last_messages: HashMap<ChatId, LastMessageState>,
    pub members: HashMap<ChatId, MemberList>,
    pub full_load: HashMap<ChatId, LoadState>,
    pub typing: HashMap<ChatId, Vec<UserId>>,

    pub current_chat_id: Option<ChatId>,
    pub current_thread_id: Option<MessageId>,
}

fn append_unique(list: &mut Vec<ChatId>, ids: impl IntoIterator<Item = ChatId>) {
    for id in ids {
        if !list.contains(&id) {
            list.push(id);
        }
    }
}

impl ChatsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one page of the conversation list.
    pub fn add_list_page(
        &mut self,
        directs: impl IntoIterator<Item = ChatId>,
        channels: impl IntoIterator<Item = ChatId>,
        next_cursor: Option<String>,
    ) {
        append_unique(&mut self.direct_ids, directs);
        append_unique(&mut self.channel_ids, channels);
        self.list.complete(next_cursor);
    }

    pub fn last_message_mut(&mut self, chat_id: &ChatId) -> &mut LastMessageState {
        self.last_messages.entry(chat_id.clone()).or_default()
    }

    pub fn last_message(&self, chat_id: &ChatId) -> Option<&LastMessageState> {
        self.last_messages.get(chat_id)
    }

    pub fn members_mut(&mut self, chat_id: &ChatId) -> &mut MemberList {
        self.members.entry(chat_id.clone()).or_default()
    }

    pub fn members(&self, chat_id: &ChatId) -> Option<&MemberList> {
        self.members.get(chat_id)
    }

    pub fn full_load_mut(&mut self, chat_id: &ChatId) -> &mut LoadState {
        self.full_load.entry(chat_id.clone()).or_default()
    }

    // ------------------------------------------------------------------
    // Typing
    // ------------------------------------------------------------------

    pub fn is_typing(&self, chat_id: &ChatId, user_id: &UserId) -> bool {
        self.typing
            .get(chat_id)
            .is_some_and(|users| users.contains(user_id))
    }

    /// Returns `false` if the user was already listed.
    pub fn set_typing(&mut self, chat_id: &ChatId, user_id: &UserId) -> bool {
        let users = self.typing.entry(chat_id.clone()).or_default();
        if users.contains(user_id) {
            return false;
        }
        users.push(user_id.clone());
        true
    }

    /// Returns `false` if the user was not listed.
    pub fn unset_typing(&mut self, chat_id: &ChatId, user_id: &UserId) -> bool {
        let Some(users) = self.typing.get_mut(chat_id) else {
            return false;
        };
        let before = users.len();
        users.retain(|u| u != user_id);
        let removed = users.len() != before;
        if users.is_empty() {
            self.typing.remove(chat_id);
        }
        removed
    }

    pub fn typing_users(&self, chat_id: &ChatId) -> &[UserId] {
        self.typing.get(chat_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
