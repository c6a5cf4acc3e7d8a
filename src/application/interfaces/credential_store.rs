use async_trait::async_trait;

use crate::domain::{CredentialKey, DomainError};

/// Durable key-value storage for API credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when nothing was ever saved under `key`.
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), DomainError>;

    /// Idempotent: succeeds when the key is already absent.
    async fn clear(&self, key: CredentialKey) -> Result<(), DomainError>;
}
