use std::sync::Arc;

use tracing::debug;

use crate::application::CredentialStore;
use crate::domain::{Credential, CredentialKey, DomainError};

pub struct LoadCredentialUseCase {
    store: Arc<dyn CredentialStore>,
    overrides: Vec<(CredentialKey, String)>,
}

impl LoadCredentialUseCase {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            overrides: Vec::new(),
        }
    }

    /// Serve `value` for `key` instead of the stored one.
    pub fn with_override(mut self, key: CredentialKey, value: impl Into<String>) -> Self {
        self.overrides.push((key, value.into()));
        self
    }

    /// Returns an empty credential when nothing is stored.
    pub async fn execute(&self, key: CredentialKey) -> Result<Credential, DomainError> {
        if let Some((_, value)) = self.overrides.iter().find(|(k, _)| *k == key) {
            debug!("Using overridden value for {}", key);
            return Ok(Credential::new(value.clone()));
        }

        let stored = self.store.get(key).await?;
        if stored.is_none() {
            debug!("No stored value for {}", key);
        }
        Ok(Credential::from(stored))
    }
}
