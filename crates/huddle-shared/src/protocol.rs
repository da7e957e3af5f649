use serde::{Deserialize, Serialize};

use crate::types::{ChatId, UserId};

/// Pagination block attached to list responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Continuation token of a response, if another page exists.
///
/// A missing metadata block, a missing token and an empty token all mean
/// the listing is exhausted.
pub fn next_cursor(meta: Option<&ResponseMetadata>) -> Option<String> {
    meta.and_then(|m| m.next_cursor.as_deref())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Conversation list response. `C` is the chat record type of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCounts<C> {
    #[serde(default)]
    pub ims: Vec<C>,
    #[serde(default)]
    pub channels: Vec<C>,
    #[serde(default)]
    pub groups: Vec<C>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Message history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History<M> {
    #[serde(default)]
    pub messages: Vec<M>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Conversation returned by the open endpoint. Its shape differs from the
/// records of the conversation list and is adapted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenedChannel {
    pub id: ChatId,
    #[serde(default)]
    pub unread_count: Option<u32>,
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub is_im: Option<bool>,
    #[serde(default)]
    pub is_open: Option<bool>,
    #[serde(default)]
    pub is_org_shared: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenedConversation {
    pub channel: OpenedChannel,
}

/// Full conversation metadata response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationInfo<C> {
    pub channel: C,
}

/// Member id page of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMembers {
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Read-marker response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkResult {
    #[serde(default)]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cursor_variants() {
        assert_eq!(next_cursor(None), None);
        assert_eq!(next_cursor(Some(&ResponseMetadata::default())), None);

        let empty = ResponseMetadata {
            next_cursor: Some(String::new()),
        };
        assert_eq!(next_cursor(Some(&empty)), None);

        let more = ResponseMetadata {
            next_cursor: Some("abc".into()),
        };
        assert_eq!(next_cursor(Some(&more)).as_deref(), Some("abc"));
    }

    #[test]
    fn test_members_page_without_metadata() {
        let page: ConversationMembers =
            serde_json::from_str(r#"{"members":["U3"],"response_metadata":{}}"#).unwrap();
        assert_eq!(page.members, vec![UserId::from("U3")]);
        assert_eq!(next_cursor(page.response_metadata.as_ref()), None);
    }

    #[test]
    fn test_opened_conversation_parses() {
        let json = r#"{"ok":true,"channel":{"id":"D9","unread_count":3,"user":"U9",
            "is_im":true,"is_open":true,"is_org_shared":false}}"#;
        let opened: OpenedConversation = serde_json::from_str(json).unwrap();
        assert_eq!(opened.channel.id, ChatId::from("D9"));
        assert_eq!(opened.channel.unread_count, Some(3));
        assert_eq!(opened.channel.is_org_shared, Some(false));
    }
}
