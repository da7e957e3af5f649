//! Normalized entity cache.
//!
//! One map per entity kind, keyed by id. Writes are merges: an incoming
//! record is folded into the known one field by field, so concurrent
//! completions of unrelated fetches can land in any order. Nothing is ever
//! removed; the cache lives as long as the process.

use std::collections::HashMap;

use huddle_shared::{ChatId, MessageId, UserId};
use serde::Serialize;
use tracing::trace;

use crate::models::{Chat, Message, User};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityStore {
    chats: HashMap<ChatId, Chat>,
    users: HashMap<UserId, User>,
    messages: HashMap<MessageId, Message>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Upsert a batch of chats. Returns how many were previously unknown.
    pub fn upsert_chats(&mut self, chats: impl IntoIterator<Item = Chat>) -> usize {
        let mut inserted = 0;
        for mut chat in chats {
            chat.fold_counterpart();
            match self.chats.get_mut(&chat.id) {
                Some(known) => known.merge(chat),
                None => {
                    inserted += 1;
                    self.chats.insert(chat.id.clone(), chat);
                }
            }
        }
        trace!(inserted, total = self.chats.len(), "chats upserted");
        inserted
    }

    pub fn upsert_users(&mut self, users: impl IntoIterator<Item = User>) -> usize {
        let mut inserted = 0;
        for user in users {
            match self.users.get_mut(&user.id) {
                Some(known) => known.merge(user),
                None => {
                    inserted += 1;
                    self.users.insert(user.id.clone(), user);
                }
            }
        }
        trace!(inserted, total = self.users.len(), "users upserted");
        inserted
    }

    pub fn upsert_messages(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut inserted = 0;
        for message in messages {
            match self.messages.get_mut(&message.ts) {
                Some(known) => known.merge(message),
                None => {
                    inserted += 1;
                    self.messages.insert(message.ts.clone(), message);
                }
            }
        }
        trace!(inserted, total = self.messages.len(), "messages upserted");
        inserted
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn chat(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.get(id)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    /// Counterpart of a direct chat, if both the chat and the user are known.
    pub fn counterpart(&self, chat_id: &ChatId) -> Option<&User> {
        let user_id = self.chat(chat_id)?.counterpart_id()?;
        self.user(user_id)
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_inserts_then_merges() {
        let mut store = EntityStore::new();

        let mut first = Chat::new("C1");
        first.name = Some("general".into());
        first.num_members = Some(10);
        assert_eq!(store.upsert_chats([first]), 1);

        let mut second = Chat::new("C1");
        second.unread_count = Some(2);
        assert_eq!(store.upsert_chats([second, Chat::new("C2")]), 1);

        let chat = store.chat(&ChatId::from("C1")).unwrap();
        assert_eq!(chat.name.as_deref(), Some("general"));
        assert_eq!(chat.num_members, Some(10));
        assert_eq!(chat.unread_count, Some(2));
        assert_eq!(store.chat_count(), 2);
    }

    #[test]
    fn test_merge_order_does_not_matter_for_disjoint_fields() {
        let mut a = Chat::new("C1");
        a.name = Some("general".into());
        let mut b = Chat::new("C1");
        b.num_members = Some(3);

        let mut left = EntityStore::new();
        left.upsert_chats([a.clone(), b.clone()]);
        let mut right = EntityStore::new();
        right.upsert_chats([b, a]);

        assert_eq!(
            left.chat(&ChatId::from("C1")),
            right.chat(&ChatId::from("C1"))
        );
    }

    #[test]
    fn test_counterpart_lookup() {
        let mut store = EntityStore::new();
        let mut dm = Chat::new("D1");
        dm.is_im = Some(true);
        dm.user_id = Some(UserId::from("U1"));
        store.upsert_chats([dm]);
        assert!(store.counterpart(&ChatId::from("D1")).is_none());

        store.upsert_users([User::new("U1")]);
        assert_eq!(
            store.counterpart(&ChatId::from("D1")).map(|u| u.id.clone()),
            Some(UserId::from("U1"))
        );
    }

    #[test]
    fn test_messages_are_keyed_by_ts() {
        let mut store = EntityStore::new();
        let mut msg = Message::new("100.1");
        msg.text = Some("hello".into());
        store.upsert_messages([msg]);
        store.upsert_messages([Message::new("100.1")]);

        assert_eq!(store.message_count(), 1);
        let stored = store.message(&MessageId::from("100.1")).unwrap();
        assert_eq!(stored.text.as_deref(), Some("hello"));
    }
}
