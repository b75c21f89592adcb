//! Scripted collaborators shared by the agent tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use taskpilot_core::error::{ProviderError, StoreError};
use taskpilot_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use taskpilot_core::task::{Task, TaskStore};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// A provider that replays a fixed script of replies, one per call.
///
/// Panics if more calls are made than replies provided. Every request is
/// kept so tests can inspect what the loop sent.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script of successful raw-text replies.
    pub fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };
        let reply = {
            let replies = self.replies.lock().unwrap();
            match replies.get(call) {
                Some(reply) => reply.clone(),
                None => panic!(
                    "ScriptedProvider: no more replies (call #{call}, have {})",
                    replies.len()
                ),
            }
        };

        reply.map(|content| ProviderResponse {
            content,
            model: "scripted-model".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// Replays a script, then cancels `token` once the first reply is returned.
pub struct CancelAfterFirstReply {
    pub inner: ScriptedProvider,
    pub token: CancellationToken,
}

#[async_trait]
impl Provider for CancelAfterFirstReply {
    fn name(&self) -> &str {
        "cancel-after-first"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let reply = self.inner.complete(request).await;
        self.token.cancel();
        reply
    }
}

/// A provider whose calls never finish.
///
/// `started` fires when a call begins. `dropped` flips when the in-flight
/// call future is dropped.
#[derive(Default)]
pub struct HangingProvider {
    pub started: Notify,
    dropped: AtomicBool,
}

impl HangingProvider {
    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag<'a>(&'a AtomicBool);

impl Drop for DropFlag<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Provider for HangingProvider {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let _flag = DropFlag(&self.dropped);
        self.started.notify_one();
        std::future::pending().await
    }
}

/// A store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl TaskStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }

    async fn create(&self, _text: &str) -> Result<i64, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }

    async fn search(&self, _query: &str) -> Result<Vec<Task>, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }

    async fn remove(&self, _id: i64) -> Result<bool, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }

    async fn update(&self, _id: i64, _text: &str) -> Result<bool, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }

    async fn get(&self, _id: i64) -> Result<Option<Task>, StoreError> {
        Err(StoreError::Storage("connection refused".into()))
    }
}
