use std::sync::Arc;

use tracing::info;

use crate::application::CredentialStore;
use crate::domain::{CredentialKey, DomainError};

pub struct SaveCredentialUseCase {
    store: Arc<dyn CredentialStore>,
}

impl SaveCredentialUseCase {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Stores `value` verbatim; an empty value is kept as an empty credential.
    pub async fn execute(&self, key: CredentialKey, value: &str) -> Result<(), DomainError> {
        self.store.set(key, value).await?;
        info!("Saved credential {}", key);
        Ok(())
    }

    pub async fn clear(&self, key: CredentialKey) -> Result<(), DomainError> {
        self.store.clear(key).await?;
        info!("Cleared credential {}", key);
        Ok(())
    }
}
