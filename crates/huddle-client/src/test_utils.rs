use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use huddle_shared::ApiError;

use crate::config::ClientConfig;
use crate::events::EventSink;
use crate::http::{ApiRequest, HttpAdapter};
use crate::state::{AppState, SharedState};
use crate::sync::ChatSync;

/// Scripted [`HttpAdapter`]: answers each path from a queue of canned
/// responses and records every request it sees.
#[derive(Default)]
pub struct MockAdapter {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>,
    requests: Mutex<Vec<ApiRequest>>,
    /// When set, every request waits for a notification before answering.
    gate: Option<Arc<Notify>>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.push(path, Ok(body));
    }

    pub fn fail(&self, path: &str, error: ApiError) {
        self.push(path, Err(error));
    }

    fn push(&self, path: &str, response: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

#[async_trait]
impl HttpAdapter for MockAdapter {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no scripted response for {path}"))))
    }
}

pub fn sync_with(adapter: Arc<MockAdapter>, config: &ClientConfig) -> (ChatSync, SharedState) {
    let state = AppState::shared();
    let sync = ChatSync::new(adapter, state.clone(), EventSink::new(), config);
    (sync, state)
}
