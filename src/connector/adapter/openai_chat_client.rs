use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{CompletionError, Credential};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal subset of a successful chat-completion body.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
}

/// HTTP client for OpenAI-compatible chat-completion endpoints.
///
/// Configuration comes from the environment with these defaults:
///
/// | Variable          | Default                  |
/// |-------------------|--------------------------|
/// | `OPENAI_BASE_URL` | `https://api.openai.com` |
/// | `OPENAI_MODEL`    | `gpt-4o-mini-2024-07-18` |
///
/// No request timeout is configured: a call runs until the transport resolves
/// or fails.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiChatClient {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            url,
        }
    }

    pub fn from_env() -> Self {
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(model, base)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Turn a status and raw body into either the first candidate's text or a
    /// typed error. Never assumes a field is present.
    pub fn decode_response(status: u16, body: &str) -> Result<String, CompletionError> {
        if !(200..300).contains(&status) {
            let detail = serde_json::from_str::<ApiErrorResponse>(body)
                .ok()
                .and_then(|r| r.error);
            let (code, message) = match detail {
                Some(detail) => (
                    detail.code.and_then(code_as_string),
                    detail.message.and_then(message_as_string),
                ),
                None => {
                    debug!("Error body without an `error` object: {body}");
                    (None, None)
                }
            };
            return Err(CompletionError::Rejected {
                status,
                code,
                message,
            });
        }

        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| CompletionError::malformed(format!("failed to parse response: {e}")))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::malformed("response has no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| CompletionError::malformed("first choice has no text content"))
    }
}

/// Error codes are usually strings, but some compatible servers send numbers.
fn code_as_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Only a string `message` is shown to the user.
fn message_as_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        credential: &Credential,
    ) -> Result<String, CompletionError> {
        let request = ApiRequest {
            model: &self.model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: system,
                },
                ApiMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::transport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            warn!("Chat API returned {status}");
        }

        Self::decode_response(status.as_u16(), &body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
