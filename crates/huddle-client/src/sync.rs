//! Chat synchronization: fetch a remote resource, merge it into the shared
//! state, advance the resource's fetch state.
//!
//! Each operation asks the resource's state machine for permission and
//! moves it to loading under a single lock acquisition, then releases the
//! lock for the network call. A second caller for the same resource sees
//! the loading state and returns without a request, so at most one request
//! per resource is ever in flight. Requests for different resources run
//! independently. A request whose caller has lost interest still completes
//! and still writes its result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use huddle_shared::constants::{
    LAST_MESSAGE_LIMIT, PATH_CONVERSATION_COUNTS, PATH_CONVERSATION_HISTORY,
    PATH_CONVERSATION_INFO, PATH_CONVERSATION_MARK, PATH_CONVERSATION_MEMBERS,
    PATH_CONVERSATION_OPEN,
};
use huddle_shared::protocol::{
    next_cursor, ConversationCounts, ConversationInfo, ConversationMembers, History, MarkResult,
    OpenedChannel, OpenedConversation,
};
use huddle_shared::{ChatId, MessageId, UserId};
use huddle_store::{Chat, Message};

use crate::config::ClientConfig;
use crate::error::{Result, SyncError};
use crate::events::{EventSink, StoreEvent};
use crate::http::{ApiRequest, HttpAdapter};
use crate::state::{lock, SharedState};

// ---------------------------------------------------------------------------
// Direct-message inclusion
// ---------------------------------------------------------------------------

/// Decides which direct chats of the conversation list are shown.
///
/// Hidden: archived or closed conversations, conversations with a deleted
/// account, and the self-chat.
#[derive(Debug, Clone, Default)]
pub struct DirectFilter {
    self_user_id: Option<UserId>,
}

impl DirectFilter {
    pub fn new(self_user_id: Option<UserId>) -> Self {
        Self { self_user_id }
    }

    pub fn includes(&self, chat: &Chat) -> bool {
        if chat.is_archived == Some(true)
            || chat.is_open == Some(false)
            || chat.is_user_deleted == Some(true)
        {
            return false;
        }
        match (&self.self_user_id, chat.counterpart_id()) {
            (Some(me), Some(counterpart)) => me != counterpart,
            _ => true,
        }
    }
}

/// Canonical chat record for a conversation returned by the open endpoint.
fn adapt_opened(channel: OpenedChannel) -> Chat {
    Chat {
        dm_count: channel.unread_count,
        is_ext_shared: channel.is_org_shared,
        is_im: channel.is_im,
        is_open: channel.is_open,
        user_id: channel.user,
        ..Chat::new(channel.id)
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct ChatSync {
    http: Arc<dyn HttpAdapter>,
    state: SharedState,
    events: EventSink,
    filter: DirectFilter,
    members_page_size: u32,
}

impl ChatSync {
    pub fn new(
        http: Arc<dyn HttpAdapter>,
        state: SharedState,
        events: EventSink,
        config: &ClientConfig,
    ) -> Self {
        Self {
            http,
            state,
            events,
            filter: DirectFilter::new(config.self_user_id.clone()),
            members_page_size: config.members_page_size,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.http.request(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch the next page of the conversation list.
    ///
    /// Returns the merged chats, or `None` when the list is exhausted, a page
    /// is already loading, or the request failed (failures are logged only).
    pub async fn fetch_chat_list(&self) -> Option<Vec<Chat>> {
        let page = lock(&self.state).chats.list.begin();
        let Some(page) = page else {
            debug!("Chat list loading or exhausted, skipping");
            return None;
        };

        let mut request = ApiRequest::new(PATH_CONVERSATION_COUNTS)
            .param("include_message", 1)
            .form();
        if let Some(cursor) = &page.cursor {
            request = request.param("cursor", cursor.as_str());
        }

        let counts = match self.request::<ConversationCounts<Chat>>(request).await {
            Ok(counts) => counts,
            Err(e) => {
                lock(&self.state).chats.list.fail();
                warn!(error = %e, "Failed to fetch chat list");
                self.events.emit(StoreEvent::FetchFailed {
                    resource: "chat_list",
                    chat_id: None,
                });
                return None;
            }
        };

        let next = next_cursor(counts.response_metadata.as_ref());
        let directs: Vec<Chat> = counts
            .ims
            .into_iter()
            .filter(|chat| self.filter.includes(chat))
            .collect();
        let channels: Vec<Chat> = counts.channels.into_iter().chain(counts.groups).collect();

        let direct_ids: Vec<ChatId> = directs.iter().map(|c| c.id.clone()).collect();
        let channel_ids: Vec<ChatId> = channels.iter().map(|c| c.id.clone()).collect();
        let chats: Vec<Chat> = directs.into_iter().chain(channels).collect();

        {
            let mut guard = lock(&self.state);
            guard.entities.upsert_chats(chats.iter().cloned());
            guard.chats.add_list_page(direct_ids.iter().cloned(), channel_ids.iter().cloned(), next);
        }

        info!(
            directs = direct_ids.len(),
            channels = channel_ids.len(),
            "Chat list page merged"
        );
        self.events.emit(StoreEvent::ChatsUpdated);

        Some(chats)
    }

    /// Fetch the most recent message of a chat, once.
    ///
    /// Skipped while a fetch is in flight and once a message is known. A
    /// chat without any message is recorded as failed. Failures are logged
    /// only.
    pub async fn fetch_last_message(&self, chat_id: &ChatId) -> Option<MessageId> {
        if !lock(&self.state).chats.last_message_mut(chat_id).begin() {
            debug!(chat_id = %chat_id, "Last message loading or loaded, skipping");
            return None;
        }

        let request = ApiRequest::new(PATH_CONVERSATION_HISTORY)
            .param("channel", chat_id.as_str())
            .param("limit", LAST_MESSAGE_LIMIT)
            .form();

        let outcome = match self.request::<History<Message>>(request).await {
            Ok(history) => match history.messages.first().map(|m| m.ts.clone()) {
                Some(message_id) => Ok((message_id, history)),
                None => Err(SyncError::EmptyResult("conversation has no messages")),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok((message_id, history)) => {
                let cursor = next_cursor(history.response_metadata.as_ref());
                {
                    let mut guard = lock(&self.state);
                    guard.entities.upsert_messages(history.messages);
                    guard
                        .chats
                        .last_message_mut(chat_id)
                        .complete(message_id.clone(), cursor);
                }
                debug!(chat_id = %chat_id, message_id = %message_id, "Last message loaded");
                self.events.emit(StoreEvent::LastMessageLoaded {
                    chat_id: chat_id.clone(),
                    message_id: message_id.clone(),
                });
                Some(message_id)
            }
            Err(e) => {
                lock(&self.state).chats.last_message_mut(chat_id).fail();
                warn!(chat_id = %chat_id, error = %e, "Failed to fetch last message");
                self.events.emit(StoreEvent::FetchFailed {
                    resource: "last_message",
                    chat_id: Some(chat_id.clone()),
                });
                None
            }
        }
    }

    /// Fetch the next page of a channel's member ids.
    ///
    /// `Ok(None)` when a page is already loading or the list is complete.
    pub async fn fetch_channel_members(&self, chat_id: &ChatId) -> Result<Option<Vec<UserId>>> {
        let page = lock(&self.state).chats.members_mut(chat_id).state.begin();
        let Some(page) = page else {
            debug!(chat_id = %chat_id, "Members loading or complete, skipping");
            return Ok(None);
        };

        let request = ApiRequest::new(PATH_CONVERSATION_MEMBERS)
            .param("channel", chat_id.as_str())
            .param("include_num_members", true)
            .param("limit", self.members_page_size)
            .param("cursor", page.cursor_or_empty());

        match self.request::<ConversationMembers>(request).await {
            Ok(resp) => {
                let next = next_cursor(resp.response_metadata.as_ref());
                {
                    let mut guard = lock(&self.state);
                    let list = guard.chats.members_mut(chat_id);
                    list.extend(resp.members.iter().cloned());
                    list.state.complete(next);
                }
                debug!(chat_id = %chat_id, count = resp.members.len(), "Member page merged");
                self.events.emit(StoreEvent::MembersUpdated {
                    chat_id: chat_id.clone(),
                });
                Ok(Some(resp.members))
            }
            Err(e) => {
                lock(&self.state).chats.members_mut(chat_id).state.fail();
                warn!(chat_id = %chat_id, error = %e, "Failed to fetch channel members");
                self.events.emit(StoreEvent::FetchFailed {
                    resource: "members",
                    chat_id: Some(chat_id.clone()),
                });
                Err(e)
            }
        }
    }

    /// Fetch the full metadata of a chat, including its member count.
    ///
    /// Returns the merged record; `Ok(None)` when already loaded or loading.
    pub async fn fetch_chat_info(&self, chat_id: &ChatId) -> Result<Option<Chat>> {
        if !lock(&self.state).chats.full_load_mut(chat_id).begin() {
            debug!(chat_id = %chat_id, "Chat info loading or loaded, skipping");
            return Ok(None);
        }

        let request = ApiRequest::new(PATH_CONVERSATION_INFO)
            .param("channel", chat_id.as_str())
            .param("include_num_members", true);

        match self.request::<ConversationInfo<Chat>>(request).await {
            Ok(info) => {
                let merged = {
                    let mut guard = lock(&self.state);
                    guard.entities.upsert_chats([info.channel]);
                    guard.chats.full_load_mut(chat_id).complete();
                    guard.entities.chat(chat_id).cloned()
                };
                debug!(chat_id = %chat_id, "Chat info loaded");
                self.events.emit(StoreEvent::ChatInfoLoaded {
                    chat_id: chat_id.clone(),
                });
                Ok(merged)
            }
            Err(e) => {
                lock(&self.state).chats.full_load_mut(chat_id).fail();
                warn!(chat_id = %chat_id, error = %e, "Failed to fetch chat info");
                self.events.emit(StoreEvent::FetchFailed {
                    resource: "chat_info",
                    chat_id: Some(chat_id.clone()),
                });
                Err(e)
            }
        }
    }

    /// Open, or reuse, the direct conversation with `user_ids` and return its id.
    pub async fn open_direct_chat(&self, user_ids: &[UserId]) -> Result<ChatId> {
        let users = user_ids
            .iter()
            .map(UserId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let request = ApiRequest::new(PATH_CONVERSATION_OPEN)
            .param("users", users)
            .param("return_im", true);

        let opened = self
            .request::<OpenedConversation>(request)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to open direct chat");
                e
            })?;

        let chat = adapt_opened(opened.channel);
        let chat_id = chat.id.clone();
        lock(&self.state).entities.upsert_chats([chat]);

        info!(chat_id = %chat_id, "Direct chat opened");
        self.events.emit(StoreEvent::ChatsUpdated);
        Ok(chat_id)
    }

    /// Move the read marker of a chat up to `message_id`.
    pub async fn mark_read(&self, chat_id: &ChatId, message_id: &MessageId) -> Result<bool> {
        let request = ApiRequest::new(PATH_CONVERSATION_MARK)
            .param("channel", chat_id.as_str())
            .param("ts", message_id.as_str());

        let result = self
            .request::<MarkResult>(request)
            .await
            .map_err(|e| {
                warn!(chat_id = %chat_id, error = %e, "Failed to mark chat read");
                e
            })?;

        debug!(chat_id = %chat_id, message_id = %message_id, ok = result.ok, "Chat marked read");
        Ok(result.ok)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn set_current_chat(&self, chat_id: &ChatId) {
        lock(&self.state).chats.current_chat_id = Some(chat_id.clone());
        self.events.emit(StoreEvent::CurrentChatChanged {
            chat_id: chat_id.clone(),
        });
    }

    /// Select a thread of the current chat.
    pub fn set_current_thread(&self, thread_id: &MessageId) {
        lock(&self.state).chats.current_thread_id = Some(thread_id.clone());
    }
}
