use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::ChatClient;
use crate::domain::{
    CompletionError, Credential, LookupFailure, LookupResult, EMPTY_PROMPT_FALLBACK,
    QUOTA_ERROR_CODE, SYSTEM_INSTRUCTION,
};

/// Issues one chat completion for a built prompt and maps the outcome to a
/// terminal [`LookupResult`].
///
/// Every error is recovered here: the returned value is always `Success` or
/// `Failure`, never `Pending`. No retries are attempted.
pub struct RunLookupUseCase {
    chat_client: Arc<dyn ChatClient>,
    system_instruction: String,
}

impl RunLookupUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self {
            chat_client,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub async fn execute(&self, prompt: &str, credential: &Credential) -> LookupResult {
        let user = if prompt.trim().is_empty() {
            EMPTY_PROMPT_FALLBACK
        } else {
            prompt
        };

        if credential.is_empty() {
            debug!("No chat credential configured; the service will decide");
        }

        info!("Requesting wine details from {}", self.chat_client.model_name());
        let start_time = Instant::now();

        let outcome = self
            .chat_client
            .complete(&self.system_instruction, user, credential)
            .await;

        let elapsed = start_time.elapsed();
        match outcome {
            Ok(text) => {
                info!("Lookup succeeded in {:.2?} ({} chars)", elapsed, text.len());
                LookupResult::Success(text)
            }
            Err(error) => {
                let failure = classify_failure(error);
                info!("Lookup failed in {:.2?}", elapsed);
                LookupResult::Failure(failure)
            }
        }
    }
}

/// Maps a chat-port error onto the lookup failure taxonomy.
pub fn classify_failure(error: CompletionError) -> LookupFailure {
    match error {
        CompletionError::Rejected {
            code: Some(ref code),
            ..
        } if code == QUOTA_ERROR_CODE => {
            warn!("Chat service reports exhausted quota");
            LookupFailure::QuotaExceeded
        }
        CompletionError::Rejected {
            status,
            code,
            message,
        } => {
            warn!(
                "Chat service rejected the lookup: status={} code={:?} message={:?}",
                status, code, message
            );
            LookupFailure::ServerRejected { code, message }
        }
        CompletionError::Transport(detail) | CompletionError::MalformedResponse(detail) => {
            warn!("Lookup transport fault: {detail}");
            LookupFailure::TransportFault(detail)
        }
    }
}
