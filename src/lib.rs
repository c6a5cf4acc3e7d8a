pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    ChatClient, ConcurrencyPolicy, CredentialStore, LoadCredentialUseCase, LookupPresenter,
    LookupSession, RunLookupUseCase, SaveCredentialUseCase, SessionPolicy, SilentPresenter,
};

pub use connector::{
    Container, ContainerConfig, InMemoryCredentialStore, JsonCredentialStore, OpenAiChatClient,
    RecordedRequest, ScriptedChatClient, ScriptedReply,
};

pub use domain::{
    build_prompt, Alert, CompletionError, Credential, CredentialKey, DomainError, ImageReference,
    LookupFailure, LookupRequest, LookupResult, LookupState, GENERIC_FAILURE_MESSAGE,
    QUOTA_EXCEEDED_MESSAGE, WINE_PROMPT_TEMPLATE,
};
