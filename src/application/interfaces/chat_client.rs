use async_trait::async_trait;

use crate::domain::{CompletionError, Credential};

/// An interface for sending chat-style prompts to an LLM and receiving text responses.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. The credential is passed per call so callers decide where it
/// comes from.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a `system` message followed by a `user` prompt and return the
    /// first candidate's text.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        credential: &Credential,
    ) -> Result<String, CompletionError>;

    /// Model identifier sent with each request (for logging purposes).
    fn model_name(&self) -> &str;
}
