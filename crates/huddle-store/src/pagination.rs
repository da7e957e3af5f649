//! Per-resource fetch state machines.
//!
//! Every remote listing the client walks (the chat list, the member list of
//! a channel, the history of a chat) carries one of these. A fetch asks the
//! state for permission with `begin`, and the answer doubles as the
//! de-duplication guard: a resource that is already loading, or that has
//! been read to the end, refuses. The fetch then reports back exactly once
//! with `complete` or `fail`.
//!
//! | From            | Event                 | To              |
//! |-----------------|-----------------------|-----------------|
//! | Idle            | begin                 | Loading         |
//! | Loading         | complete(Some(c))     | Loaded(c)       |
//! | Loading         | complete(None)        | End             |
//! | Loading         | fail                  | Failed          |
//! | Loaded(c)       | begin                 | Loading(c)      |
//! | Failed          | begin                 | Loading         |
//! | End / Loading   | begin                 | refused         |

use huddle_shared::constants::END_CURSOR;
use huddle_shared::MessageId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cursor-paginated listings
// ---------------------------------------------------------------------------

/// Permission to fetch one page, starting at `cursor` (`None` = first page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
}

impl PageRequest {
    /// Cursor as sent on the wire, where the first page is the empty string.
    pub fn cursor_or_empty(&self) -> &str {
        self.cursor.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    #[default]
    Idle,
    /// A page request is in flight; `cursor` is where it started.
    Loading { cursor: Option<String> },
    /// At least one page arrived and more are available from `cursor`.
    Loaded { cursor: String },
    /// The listing is exhausted. Terminal.
    End,
    /// The last page request failed; a retry resumes from `cursor`.
    Failed { cursor: Option<String> },
}

impl PageState {
    /// Guard and start transition in one step.
    pub fn begin(&mut self) -> Option<PageRequest> {
        let cursor = match self {
            Self::Idle => None,
            Self::Loaded { cursor } => Some(cursor.clone()),
            Self::Failed { cursor } => cursor.clone(),
            Self::Loading { .. } | Self::End => return None,
        };
        *self = Self::Loading {
            cursor: cursor.clone(),
        };
        Some(PageRequest { cursor })
    }

    /// Record a successful page. `next_cursor == None` ends the listing.
    pub fn complete(&mut self, next_cursor: Option<String>) {
        *self = match next_cursor {
            Some(cursor) => Self::Loaded { cursor },
            None => Self::End,
        };
    }

    pub fn fail(&mut self) {
        let cursor = match std::mem::take(self) {
            Self::Loading { cursor } | Self::Failed { cursor } => cursor,
            Self::Loaded { cursor } => Some(cursor),
            Self::Idle | Self::End => None,
        };
        *self = Self::Failed { cursor };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Stored continuation cursor, using the `"end"` sentinel for an
    /// exhausted listing and `None` when nothing was fetched yet.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { cursor } | Self::Failed { cursor } => cursor.as_deref(),
            Self::Loaded { cursor } => Some(cursor),
            Self::End => Some(END_CURSOR),
        }
    }
}

// ---------------------------------------------------------------------------
// Last message of a chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LastMessageState {
    #[default]
    Idle,
    Loading,
    /// `cursor` continues into older history; `None` means there is none.
    Loaded {
        message_id: MessageId,
        cursor: Option<String>,
    },
    Failed,
}

impl LastMessageState {
    /// Refuses while loading and once a message is known.
    pub fn begin(&mut self) -> bool {
        match self {
            Self::Idle | Self::Failed => {
                *self = Self::Loading;
                true
            }
            Self::Loading | Self::Loaded { .. } => false,
        }
    }

    pub fn complete(&mut self, message_id: MessageId, cursor: Option<String>) {
        *self = Self::Loaded { message_id, cursor };
    }

    pub fn fail(&mut self) {
        *self = Self::Failed;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::Loaded { message_id, .. } => Some(message_id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Single-shot resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    /// Refuses while loading and once loaded.
    pub fn begin(&mut self) -> bool {
        match self {
            Self::Idle | Self::Failed => {
                *self = Self::Loading;
                true
            }
            Self::Loading | Self::Loaded => false,
        }
    }

    pub fn complete(&mut self) {
        *self = Self::Loaded;
    }

    pub fn fail(&mut self) {
        *self = Self::Failed;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_state_walks_to_end() {
        let mut state = PageState::default();
        assert_eq!(state.cursor(), None);

        let req = state.begin().unwrap();
        assert_eq!(req.cursor, None);
        assert_eq!(req.cursor_or_empty(), "");
        assert!(state.is_loading());

        state.complete(Some("abc".into()));
        assert_eq!(state.cursor(), Some("abc"));

        let req = state.begin().unwrap();
        assert_eq!(req.cursor.as_deref(), Some("abc"));

        state.complete(None);
        assert!(state.is_end());
        assert_eq!(state.cursor(), Some(END_CURSOR));
    }

    #[test]
    fn test_page_state_refuses_while_loading() {
        let mut state = PageState::default();
        assert!(state.begin().is_some());
        assert!(state.begin().is_none());
    }

    #[test]
    fn test_page_state_end_is_terminal() {
        let mut state = PageState::End;
        for _ in 0..3 {
            assert!(state.begin().is_none());
        }
        assert!(state.is_end());
    }

    #[test]
    fn test_page_state_retry_resumes_from_failed_cursor() {
        let mut state = PageState::Loaded {
            cursor: "abc".into(),
        };
        state.begin().unwrap();
        state.fail();
        assert!(state.is_failed());

        let retry = state.begin().unwrap();
        assert_eq!(retry.cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_last_message_guard() {
        let mut state = LastMessageState::default();
        assert!(state.begin());
        assert!(!state.begin());

        state.fail();
        assert!(state.begin());

        state.complete(MessageId::from("1.1"), None);
        assert_eq!(state.message_id(), Some(&MessageId::from("1.1")));
        assert!(!state.begin());
    }

    #[test]
    fn test_load_state_guard() {
        let mut state = LoadState::default();
        assert!(state.begin());
        assert!(!state.begin());
        state.complete();
        assert!(state.is_loaded());
        assert!(!state.begin());
    }

    #[test]
    fn test_page_state_serializes_tagged() {
        let json = serde_json::to_value(PageState::Loaded {
            cursor: "abc".into(),
        })
        .unwrap();
        assert_eq!(json["state"], "loaded");
        assert_eq!(json["cursor"], "abc");
    }
}
