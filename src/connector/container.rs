use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatClient, CredentialStore, LoadCredentialUseCase, LookupPresenter, LookupSession,
    RunLookupUseCase, SaveCredentialUseCase, SessionPolicy,
};
use crate::connector::adapter::{
    JsonCredentialStore, OpenAiChatClient, ScriptedChatClient, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::domain::CredentialKey;

/// Environment variable that overrides the stored chat credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct ContainerConfig {
    pub data_dir: String,
    /// Falls back to `OPENAI_BASE_URL`, then the public endpoint.
    pub base_url: Option<String>,
    /// Falls back to `OPENAI_MODEL`, then the default model.
    pub model: Option<String>,
    /// Answer lookups offline with the scripted client.
    pub mock: bool,
    pub session_policy: SessionPolicy,
}

pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    credential_store: Arc<dyn CredentialStore>,
    run_lookup: Arc<RunLookupUseCase>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let data_dir = PathBuf::from(&config.data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let credential_store: Arc<dyn CredentialStore> =
            Arc::new(JsonCredentialStore::in_dir(&data_dir));

        let chat_client: Arc<dyn ChatClient> = if config.mock {
            debug!("Using scripted chat client");
            Arc::new(ScriptedChatClient::new())
        } else {
            let base_url = config
                .base_url
                .clone()
                .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            let model = config
                .model
                .clone()
                .or_else(|| std::env::var("OPENAI_MODEL").ok())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());
            let client = OpenAiChatClient::new(model, base_url);
            debug!("Using chat endpoint {}", client.url());
            Arc::new(client)
        };

        let run_lookup = Arc::new(RunLookupUseCase::new(chat_client.clone()));

        Ok(Self {
            chat_client,
            credential_store,
            run_lookup,
            config,
        })
    }

    pub fn chat_client(&self) -> Arc<dyn ChatClient> {
        self.chat_client.clone()
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        self.credential_store.clone()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Fresh session, i.e. one "screen instance".
    pub fn lookup_session(&self, presenter: Arc<dyn LookupPresenter>) -> LookupSession {
        LookupSession::new(self.run_lookup.clone(), presenter)
            .with_policy(self.config.session_policy)
    }

    pub fn load_credential_use_case(&self) -> LoadCredentialUseCase {
        let use_case = LoadCredentialUseCase::new(self.credential_store.clone());
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => {
                debug!("{} is set; it takes precedence over the stored key", API_KEY_ENV);
                use_case.with_override(CredentialKey::ChatApiKey, key)
            }
            _ => use_case,
        }
    }

    pub fn save_credential_use_case(&self) -> SaveCredentialUseCase {
        SaveCredentialUseCase::new(self.credential_store.clone())
    }
}
