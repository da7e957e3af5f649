pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod state;
pub mod sync;
pub mod typing;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use huddle_shared::ApiError;

pub use crate::config::ClientConfig;
pub use crate::error::{Result, SyncError};
pub use crate::events::{EventSink, StoreEvent};
pub use crate::http::{ApiRequest, HttpAdapter, ReqwestAdapter};
pub use crate::state::{lock, AppState, SharedState};
pub use crate::sync::{ChatSync, DirectFilter};
pub use crate::typing::TypingTracker;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("huddle=info,huddle_client_lib=debug,huddle_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Wired client: one shared state, one event channel, the synchronization
/// service and the typing tracker.
pub struct Huddle {
    pub state: SharedState,
    pub events: EventSink,
    pub sync: ChatSync,
    pub typing: TypingTracker,
}

impl Huddle {
    /// Build a client that talks to the configured API over HTTP.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ApiError> {
        let adapter = ReqwestAdapter::new(config)?;
        Ok(Self::with_adapter(Arc::new(adapter), config))
    }

    pub fn with_adapter(http: Arc<dyn HttpAdapter>, config: &ClientConfig) -> Self {
        let state = AppState::shared();
        let events = EventSink::new();
        let sync = ChatSync::new(http, state.clone(), events.clone(), config);
        let typing = TypingTracker::new(state.clone(), events.clone(), config.typing_timeout);

        tracing::info!(api_url = %config.api_url, "Huddle client ready");

        Self {
            state,
            events,
            sync,
            typing,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_shared::constants::PATH_CONVERSATION_COUNTS;
    use huddle_shared::{ChatId, UserId};
    use serde_json::json;

    use crate::test_utils::MockAdapter;

    #[tokio::test]
    async fn test_components_share_state_and_events() {
        let adapter = Arc::new(MockAdapter::new());
        adapter.respond(
            PATH_CONVERSATION_COUNTS,
            json!({"channels": [{"id": "C1", "name": "general"}]}),
        );
        let huddle = Huddle::with_adapter(adapter, &ClientConfig::default());
        let mut rx = huddle.subscribe();

        huddle.sync.fetch_chat_list().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::ChatsUpdated);

        huddle
            .typing
            .signal_typing(&UserId::from("U1"), &ChatId::from("C1"));
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::TypingChanged {
                chat_id: ChatId::from("C1")
            }
        );

        let guard = lock(&huddle.state);
        assert_eq!(guard.channel_cells().len(), 1);
        assert!(guard
            .chats
            .is_typing(&ChatId::from("C1"), &UserId::from("U1")));
    }
}
