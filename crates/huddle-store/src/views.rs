//! Read-side projections for list and detail screens.
//!
//! These are plain data; rendering is left to the UI layer.

use huddle_shared::ChatId;
use serde::Serialize;

use crate::chats::ChatsState;
use crate::entities::EntityStore;
use crate::models::{Chat, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Direct,
    Channel,
}

impl ChatType {
    pub fn of(chat: &Chat) -> Self {
        if chat.is_direct() {
            Self::Direct
        } else {
            Self::Channel
        }
    }
}

/// Channel name, or the counterpart's name for a direct chat.
pub fn display_name(store: &EntityStore, chat: &Chat) -> Option<String> {
    match ChatType::of(chat) {
        ChatType::Channel => chat.name.clone(),
        ChatType::Direct => store
            .counterpart(&chat.id)
            .and_then(|user| user.profile.as_ref())
            .and_then(|profile| profile.best_name())
            .map(str::to_string),
    }
}

/// Placeholder shown instead of the text of a message with attachments.
fn preview_text(message: Option<&Message>) -> String {
    let Some(message) = message else {
        return "No history".to_string();
    };
    match message.files.as_deref() {
        Some([file]) => {
            let mimetype = file.mimetype.as_deref().unwrap_or("");
            if mimetype.starts_with("image") {
                "Image".to_string()
            } else if mimetype.starts_with("video") {
                "Video".to_string()
            } else {
                "File".to_string()
            }
        }
        Some(files) if files.len() > 1 => "Several files".to_string(),
        _ => message.text.clone().unwrap_or_default(),
    }
}

/// One row of the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCellView {
    pub chat_id: ChatId,
    pub chat_type: ChatType,
    /// `None` while the counterpart of a direct chat is unknown.
    pub name: Option<String>,
    pub preview: String,
    /// Hidden (`None`) when there is nothing unread.
    pub unread: Option<u32>,
    /// `HH:MM` (UTC) of the last message.
    pub time: Option<String>,
    pub loading: bool,
    pub selected: bool,
}

impl ChatCellView {
    pub fn build(store: &EntityStore, chats: &ChatsState, chat_id: &ChatId) -> Option<Self> {
        let chat = store.chat(chat_id)?;
        let chat_type = ChatType::of(chat);
        let status = chats.last_message(chat_id);
        let message_id = status.and_then(|s| s.message_id());
        let last_message = message_id.and_then(|id| store.message(id));

        let unread = match chat_type {
            ChatType::Channel => chat.unread_count,
            ChatType::Direct => chat.dm_count,
        }
        .filter(|n| *n > 0);

        Some(Self {
            chat_id: chat_id.clone(),
            chat_type,
            name: display_name(store, chat),
            preview: preview_text(last_message),
            unread,
            time: message_id
                .and_then(|id| id.timestamp())
                .map(|ts| ts.format("%H:%M").to_string()),
            loading: status.is_some_and(|s| s.is_loading()),
            selected: chats.current_chat_id.as_ref() == Some(chat_id),
        })
    }
}

/// Header and member list of the channel details screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelDetailsView {
    pub chat_id: ChatId,
    pub chat_type: ChatType,
    pub name: Option<String>,
    pub is_private: bool,
    pub purpose: Option<String>,
    /// `"<n> MEMBERS"` for public channels with a known count, empty otherwise.
    pub members_header: String,
    pub member_ids: Vec<huddle_shared::UserId>,
    pub members_loading: bool,
}

impl ChannelDetailsView {
    pub fn build(store: &EntityStore, chats: &ChatsState, chat_id: &ChatId) -> Option<Self> {
        let chat = store.chat(chat_id)?;
        let is_private = chat.is_private.unwrap_or(false);
        let members_header = match chat.num_members {
            Some(n) if n > 0 && !is_private => format!("{n} MEMBERS"),
            _ => String::new(),
        };
        let members = chats.members(chat_id);

        Some(Self {
            chat_id: chat_id.clone(),
            chat_type: ChatType::of(chat),
            name: display_name(store, chat),
            is_private,
            purpose: chat
                .purpose
                .as_ref()
                .map(|p| p.value.clone())
                .filter(|v| !v.is_empty()),
            members_header,
            member_ids: members.map(|m| m.ids.clone()).unwrap_or_default(),
            members_loading: members.is_some_and(|m| m.state.is_loading()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{File, Purpose, User, UserProfile};
    use huddle_shared::{MessageId, UserId};

    fn direct(store: &mut EntityStore) -> ChatId {
        let mut chat = Chat::new("D1");
        chat.is_im = Some(true);
        chat.user_id = Some(UserId::from("U1"));
        chat.dm_count = Some(2);
        store.upsert_chats([chat]);
        ChatId::from("D1")
    }

    #[test]
    fn test_cell_without_history() {
        let mut store = EntityStore::new();
        let id = direct(&mut store);
        let chats = ChatsState::new();

        let cell = ChatCellView::build(&store, &chats, &id).unwrap();
        assert_eq!(cell.chat_type, ChatType::Direct);
        assert_eq!(cell.name, None);
        assert_eq!(cell.preview, "No history");
        assert_eq!(cell.unread, Some(2));
        assert_eq!(cell.time, None);
        assert!(!cell.selected);
    }

    #[test]
    fn test_cell_with_last_message() {
        let mut store = EntityStore::new();
        let id = direct(&mut store);
        store.upsert_users([User {
            profile: Some(UserProfile {
                real_name_normalized: Some("Ada".into()),
                ..UserProfile::default()
            }),
            ..User::new("U1")
        }]);
        let mut msg = Message::new("3600.0001");
        msg.files = Some(vec![File {
            mimetype: Some("image/png".into()),
            ..File::default()
        }]);
        store.upsert_messages([msg]);

        let mut chats = ChatsState::new();
        chats
            .last_message_mut(&id)
            .complete(MessageId::from("3600.0001"), None);
        chats.current_chat_id = Some(id.clone());

        let cell = ChatCellView::build(&store, &chats, &id).unwrap();
        assert_eq!(cell.name.as_deref(), Some("Ada"));
        assert_eq!(cell.preview, "Image");
        assert_eq!(cell.time.as_deref(), Some("01:00"));
        assert!(cell.selected);
    }

    #[test]
    fn test_preview_for_several_files_and_text() {
        let mut msg = Message::new("1.0");
        msg.text = Some("hello".into());
        assert_eq!(preview_text(Some(&msg)), "hello");

        msg.files = Some(vec![File::default(), File::default()]);
        assert_eq!(preview_text(Some(&msg)), "Several files");

        msg.files = Some(vec![File {
            mimetype: Some("application/pdf".into()),
            ..File::default()
        }]);
        assert_eq!(preview_text(Some(&msg)), "File");
    }

    #[test]
    fn test_channel_unread_uses_channel_counter() {
        let mut store = EntityStore::new();
        let mut chat = Chat::new("C1");
        chat.name = Some("general".into());
        chat.unread_count = Some(0);
        chat.dm_count = Some(7);
        store.upsert_chats([chat]);

        let cell = ChatCellView::build(&store, &ChatsState::new(), &ChatId::from("C1")).unwrap();
        assert_eq!(cell.chat_type, ChatType::Channel);
        assert_eq!(cell.name.as_deref(), Some("general"));
        assert_eq!(cell.unread, None);
    }

    #[test]
    fn test_channel_details() {
        let mut store = EntityStore::new();
        let mut chat = Chat::new("C1");
        chat.name = Some("general".into());
        chat.num_members = Some(12);
        chat.purpose = Some(Purpose {
            value: "Company-wide announcements".into(),
            ..Purpose::default()
        });
        store.upsert_chats([chat]);

        let mut chats = ChatsState::new();
        let id = ChatId::from("C1");
        chats.members_mut(&id).extend([UserId::from("U1")]);

        let view = ChannelDetailsView::build(&store, &chats, &id).unwrap();
        assert_eq!(view.members_header, "12 MEMBERS");
        assert_eq!(view.purpose.as_deref(), Some("Company-wide announcements"));
        assert_eq!(view.member_ids, vec![UserId::from("U1")]);
        assert!(!view.members_loading);
    }

    #[test]
    fn test_private_channel_hides_member_count() {
        let mut store = EntityStore::new();
        let mut chat = Chat::new("G1");
        chat.is_private = Some(true);
        chat.num_members = Some(4);
        store.upsert_chats([chat]);

        let view =
            ChannelDetailsView::build(&store, &ChatsState::new(), &ChatId::from("G1")).unwrap();
        assert!(view.is_private);
        assert_eq!(view.members_header, "");
    }

    #[test]
    fn test_unknown_chat_has_no_view() {
        let store = EntityStore::new();
        assert!(ChatCellView::build(&store, &ChatsState::new(), &ChatId::from("X")).is_none());
    }
}
