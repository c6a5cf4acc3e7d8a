use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CredentialStore;
use crate::domain::{CredentialKey, DomainError};

pub struct InMemoryCredentialStore {
    entries: Arc<Mutex<HashMap<CredentialKey, String>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), DomainError> {
        self.entries.lock().await.insert(key, value.to_string());
        debug!("Stored {} in memory", key);
        Ok(())
    }

    async fn clear(&self, key: CredentialKey) -> Result<(), DomainError> {
        self.entries.lock().await.remove(&key);
        Ok(())
    }
}
