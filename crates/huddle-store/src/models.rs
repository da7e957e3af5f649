//! Entity records held by the [`EntityStore`](crate::EntityStore).
//!
//! Every field except the id is optional: the remote service returns
//! different subsets of a record depending on the endpoint, and a partial
//! payload must never erase what an earlier, richer payload taught us.
//! Fields the typed model does not know about are kept in `extra` so they
//! survive a merge as well.

use huddle_shared::{ChatId, MessageId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Replace `slot` only when the incoming payload carries a value.
fn overwrite<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn merge_extra(slot: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        slot.insert(key, value);
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Free-text purpose (or topic) attached to a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Purpose {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub last_set: Option<i64>,
}

/// A conversation: direct chat, public channel or private group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: ChatId,
    /// Channel name. Direct chats have none; they are named after the counterpart.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub is_im: Option<bool>,
    #[serde(default)]
    pub is_channel: Option<bool>,
    #[serde(default)]
    pub is_group: Option<bool>,
    #[serde(default)]
    pub is_mpim: Option<bool>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub is_archived: Option<bool>,
    #[serde(default)]
    pub is_member: Option<bool>,
    #[serde(default)]
    pub is_ext_shared: Option<bool>,

    /// Counterpart of a direct chat.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Counterpart under the key the open and info endpoints use. Folded
    /// into `user_id` when the record enters the store.
    #[serde(default, skip_serializing)]
    pub user: Option<UserId>,
    /// Set on direct chats whose counterpart account was deleted.
    #[serde(default)]
    pub is_user_deleted: Option<bool>,

    /// Unread counter of a direct chat.
    #[serde(default)]
    pub dm_count: Option<u32>,
    /// Unread counter of a channel or group.
    #[serde(default)]
    pub unread_count: Option<u32>,
    #[serde(default)]
    pub mention_count: Option<u32>,

    #[serde(default)]
    pub purpose: Option<Purpose>,
    #[serde(default)]
    pub num_members: Option<u32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chat {
    pub fn new(id: impl Into<ChatId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_direct(&self) -> bool {
        self.is_im.unwrap_or(false)
    }

    /// Counterpart user of a direct chat, whichever key carried it.
    pub fn counterpart_id(&self) -> Option<&UserId> {
        self.user_id.as_ref().or(self.user.as_ref())
    }

    /// Move a counterpart given as `user` into `user_id`.
    pub fn fold_counterpart(&mut self) {
        let user = self.user.take();
        if self.user_id.is_none() {
            self.user_id = user;
        }
    }

    /// Fold a newer payload for the same chat into this record.
    pub fn merge(&mut self, incoming: Chat) {
        overwrite(&mut self.name, incoming.name);
        overwrite(&mut self.is_im, incoming.is_im);
        overwrite(&mut self.is_channel, incoming.is_channel);
        overwrite(&mut self.is_group, incoming.is_group);
        overwrite(&mut self.is_mpim, incoming.is_mpim);
        overwrite(&mut self.is_private, incoming.is_private);
        overwrite(&mut self.is_open, incoming.is_open);
        overwrite(&mut self.is_archived, incoming.is_archived);
        overwrite(&mut self.is_member, incoming.is_member);
        overwrite(&mut self.is_ext_shared, incoming.is_ext_shared);
        overwrite(&mut self.user_id, incoming.user_id.or(incoming.user));
        overwrite(&mut self.is_user_deleted, incoming.is_user_deleted);
        overwrite(&mut self.dm_count, incoming.dm_count);
        overwrite(&mut self.unread_count, incoming.unread_count);
        overwrite(&mut self.mention_count, incoming.mention_count);
        overwrite(&mut self.purpose, incoming.purpose);
        overwrite(&mut self.num_members, incoming.num_members);
        merge_extra(&mut self.extra, incoming.extra);
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name_normalized: Option<String>,
    #[serde(default)]
    pub real_name_normalized: Option<String>,
    #[serde(default)]
    pub image_72: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn merge(&mut self, incoming: UserProfile) {
        overwrite(&mut self.display_name_normalized, incoming.display_name_normalized);
        overwrite(&mut self.real_name_normalized, incoming.real_name_normalized);
        overwrite(&mut self.image_72, incoming.image_72);
        merge_extra(&mut self.extra, incoming.extra);
    }

    /// Display name, falling back to the real name. Empty names count as missing.
    pub fn best_name(&self) -> Option<&str> {
        self.display_name_normalized
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.real_name_normalized.as_deref().filter(|n| !n.is_empty()))
    }
}

/// A workspace member.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub is_bot: Option<bool>,
    #[serde(default)]
    pub profile: Option<UserProfile>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn merge(&mut self, incoming: User) {
        overwrite(&mut self.name, incoming.name);
        overwrite(&mut self.real_name, incoming.real_name);
        overwrite(&mut self.deleted, incoming.deleted);
        overwrite(&mut self.is_bot, incoming.is_bot);
        match (&mut self.profile, incoming.profile) {
            (Some(current), Some(profile)) => current.merge(profile),
            (slot, profile) => overwrite(slot, profile),
        }
        merge_extra(&mut self.extra, incoming.extra);
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// File attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct File {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

/// A chat message, keyed by its `ts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub ts: MessageId,
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<MessageId>,
    #[serde(default)]
    pub files: Option<Vec<File>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(ts: impl Into<MessageId>) -> Self {
        Self {
            ts: ts.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.ts
    }

    pub fn merge(&mut self, incoming: Message) {
        overwrite(&mut self.user, incoming.user);
        overwrite(&mut self.text, incoming.text);
        overwrite(&mut self.thread_ts, incoming.thread_ts);
        overwrite(&mut self.files, incoming.files);
        merge_extra(&mut self.extra, incoming.extra);
    }
}
