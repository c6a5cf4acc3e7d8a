//! OpenAiChatClient against a local fake chat-completion server.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use vinho::{
    ChatClient, CompletionError, Credential, LookupFailure, LookupRequest, LookupResult,
    LookupSession, OpenAiChatClient, RunLookupUseCase, SilentPresenter, GENERIC_FAILURE_MESSAGE,
};

#[derive(Clone, Default)]
struct Captured {
    authorization: Option<String>,
    content_type: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct FakeServer {
    status: StatusCode,
    reply: String,
    captured: Arc<Mutex<Captured>>,
}

async fn completions(
    State(server): State<FakeServer>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    *server.captured.lock().unwrap() = Captured {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: Some(body),
    };
    (server.status, server.reply.clone())
}

/// Serve one canned reply on an ephemeral port; returns the base URL.
async fn serve(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Captured>>) {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let state = FakeServer {
        status,
        reply: reply.to_string(),
        captured: captured.clone(),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (format!("http://{addr}"), captured)
}

#[tokio::test]
async fn sends_bearer_header_and_documented_body() {
    let (base, captured) = serve(
        StatusCode::OK,
        json!({"choices": [{"message": {"role": "assistant", "content": "Um tawny elegante."}}]}),
    )
    .await;
    let client = OpenAiChatClient::new("gpt-4o-mini-2024-07-18", base);

    let text = client
        .complete("system text", "user prompt", &Credential::new("sk-test"))
        .await
        .expect("complete");
    assert_eq!(text, "Um tawny elegante.");

    let captured = captured.lock().unwrap().clone();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer sk-test"));
    assert!(captured
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("application/json"));
    assert_eq!(
        captured.body.expect("body"),
        json!({
            "model": "gpt-4o-mini-2024-07-18",
            "messages": [
                {"role": "system", "content": "system text"},
                {"role": "user", "content": "user prompt"}
            ]
        })
    );
}

#[tokio::test]
async fn quota_error_body_is_decoded() {
    let (base, _) = serve(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": "insufficient_quota", "message": "You exceeded your current quota", "type": "insufficient_quota"}}),
    )
    .await;
    let client = OpenAiChatClient::new("m", base);

    let err = client
        .complete("s", "u", &Credential::new("k"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CompletionError::Rejected {
            status: 429,
            code: Some("insufficient_quota".into()),
            message: Some("You exceeded your current quota".into()),
        }
    );
}

#[tokio::test]
async fn lookup_against_server_reports_bad_request_message() {
    let (base, _) = serve(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": null, "message": "bad request"}}),
    )
    .await;
    let run_lookup = Arc::new(RunLookupUseCase::new(Arc::new(OpenAiChatClient::new("m", base))));
    let session = LookupSession::new(run_lookup, Arc::new(SilentPresenter));

    let result = session
        .submit(
            &LookupRequest::new().with_wine_name("Barca Velha"),
            &Credential::new("k"),
        )
        .await
        .expect("submit");

    assert_eq!(
        result,
        LookupResult::Failure(LookupFailure::ServerRejected {
            code: None,
            message: Some("bad request".into()),
        })
    );
    assert_eq!(
        session.state().await.alert().expect("alert").message,
        "bad request"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_fault() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let run_lookup = Arc::new(RunLookupUseCase::new(Arc::new(OpenAiChatClient::new(
        "m",
        format!("http://{addr}"),
    ))));
    let session = LookupSession::new(run_lookup, Arc::new(SilentPresenter));

    let result = session
        .submit(&LookupRequest::new(), &Credential::new("k"))
        .await
        .expect("submit");

    assert!(matches!(
        result,
        LookupResult::Failure(LookupFailure::TransportFault(_))
    ));
    let state = session.state().await;
    assert!(!state.is_loading());
    assert_eq!(state.alert().expect("alert").message, GENERIC_FAILURE_MESSAGE);
}
