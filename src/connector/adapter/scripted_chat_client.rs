use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{CompletionError, Credential};

/// One canned answer.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Error(CompletionError),
    /// Never resolves; the caller has to drop the future.
    Hang,
    /// Waits for the gate to be notified, then answers with the text.
    Gated(Arc<Notify>, String),
}

/// A request as seen by [`ScriptedChatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub credential: String,
}

/// Offline [`ChatClient`] that plays back queued replies in order.
///
/// Once the queue is empty it echoes the last line of the user prompt, which
/// keeps `--mock` runs useful without network access.
pub struct ScriptedChatClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    calls: AtomicUsize,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn push(&self, reply: ScriptedReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `complete` calls started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    fn echo(user: &str) -> String {
        let last_line = user.lines().last().unwrap_or_default();
        format!("[mock] {}", last_line)
    }
}

impl Default for ScriptedChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        credential: &Credential,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(RecordedRequest {
            system: system.to_string(),
            user: user.to_string(),
            credential: credential.expose().to_string(),
        });

        let reply = self.replies.lock().await.pop_front();
        debug!("Scripted chat client replying with {:?}", reply);

        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Error(error)) => Err(error),
            Some(ScriptedReply::Hang) => std::future::pending().await,
            Some(ScriptedReply::Gated(gate, text)) => {
                gate.notified().await;
                Ok(text)
            }
            None => Ok(Self::echo(user)),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_queue_then_echoes() {
        let client = ScriptedChatClient::with_replies([
            ScriptedReply::Text("first".into()),
            ScriptedReply::Error(CompletionError::transport("down")),
        ]);
        let credential = Credential::new("k");

        assert_eq!(client.complete("s", "u", &credential).await.unwrap(), "first");
        assert!(client.complete("s", "u", &credential).await.is_err());
        assert_eq!(
            client
                .complete("s", "line one\nNome do vinho: Porto", &credential)
                .await
                .unwrap(),
            "[mock] Nome do vinho: Porto"
        );
        assert_eq!(client.calls(), 3);
        assert_eq!(client.requests().await[0].credential, "k");
    }

    #[tokio::test]
    async fn gated_reply_waits_for_notify() {
        let gate = Arc::new(Notify::new());
        let client = ScriptedChatClient::with_replies([ScriptedReply::Gated(
            gate.clone(),
            "late".into(),
        )]);

        gate.notify_one();
        let text = client
            .complete("s", "u", &Credential::new("k"))
            .await
            .unwrap();
        assert_eq!(text, "late");
    }
}
