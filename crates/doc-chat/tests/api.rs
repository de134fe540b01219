//! HTTP shell driven through the router with `oneshot`

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use doc_chat::error::QUOTA_EXCEEDED_MESSAGE;
use doc_chat::providers::{LlmProvider, ServiceReply};
use doc_chat::server::{state::AppState, DocChatServer};
use doc_chat::session::{MISSING_DOCUMENT_MESSAGE, MISSING_INPUT_MESSAGE};
use doc_chat::DocChatConfig;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "doc-chat-test-boundary";

/// Answers every prompt with the same reply and records the credentials used
struct CannedProvider {
    reply: ServiceReply,
    credentials: Mutex<Vec<String>>,
}

impl CannedProvider {
    fn new(reply: ServiceReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            credentials: Mutex::new(Vec::new()),
        })
    }

    fn credentials(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for CannedProvider {
    async fn generate(&self, _prompt: &str, credential: &str) -> doc_chat::Result<ServiceReply> {
        self.credentials.lock().unwrap().push(credential.to_string());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-model"
    }
}

fn answer_reply(text: &str) -> ServiceReply {
    ServiceReply::ok(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string())
}

fn router_with(provider: Arc<CannedProvider>, api_key: Option<&str>) -> Router {
    let mut config = DocChatConfig::default();
    config.llm.api_key = api_key.map(str::to_string);
    DocChatServer::with_state(AppState::with_provider(config, provider)).router()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, bytes)
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn upload(session_id: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(format!("/api/sessions/{session_id}/document"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn new_session(router: &Router) -> String {
    let (status, body) = send_json(router, Request::post("/api/sessions").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let router = router_with(CannedProvider::new(answer_reply("x")), None);
    let (status, _, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_csv_question_and_exports() {
    let provider = CannedProvider::new(answer_reply("Row 1 has a and 1."));
    let router = router_with(provider.clone(), None);
    let id = new_session(&router).await;

    // Question before any document is guarded
    let (status, body) = send_json(
        &router,
        post_json(&format!("/api/sessions/{id}/query"), json!({"question": "what?", "api_key": "k"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "missing_document");
    assert_eq!(body["message"], MISSING_DOCUMENT_MESSAGE);
    assert!(provider.credentials().is_empty());

    let (status, body) = send_json(&router, upload(&id, "rows.csv", "text/csv", b"a,1\nb,2\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_context"], true);
    assert_eq!(body["document"]["format"], "csv");

    let (status, body) = send_json(
        &router,
        post_json(
            &format!("/api/sessions/{id}/query"),
            json!({"question": "What is in row 1?", "api_key": "user-key"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "answered");
    assert_eq!(body["answer"], "Row 1 has a and 1.");
    assert_eq!(body["transcript_len"], 1);
    assert_eq!(provider.credentials(), vec!["user-key".to_string()]);

    let (_, body) = send_json(&router, get(&format!("/api/sessions/{id}/transcript"))).await;
    assert_eq!(
        body["entries"],
        json!([{"question": "What is in row 1?", "answer": "Row 1 has a and 1."}])
    );

    let (_, headers, markdown) = send(&router, get(&format!("/api/sessions/{id}/transcript?format=markdown"))).await;
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/markdown"));
    assert_eq!(
        String::from_utf8(markdown).unwrap(),
        "**You:** What is in row 1?\n**Chatbot:** Row 1 has a and 1.\n\n"
    );

    let (status, headers, csv_bytes) = send(&router, get(&format!("/api/sessions/{id}/export/csv"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"chat_history.csv\""
    );
    assert_eq!(
        String::from_utf8(csv_bytes).unwrap(),
        "Query,Response\nWhat is in row 1?,Row 1 has a and 1.\n"
    );

    let (status, _, pdf_bytes) = send(&router, get(&format!("/api/sessions/{id}/export/pdf"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf_bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_fallback_and_missing_credential() {
    let provider = CannedProvider::new(answer_reply("ok"));
    let with_key = router_with(provider.clone(), Some("configured-key"));
    let id = new_session(&with_key).await;
    send(&with_key, upload(&id, "rows.csv", "text/csv", b"a,1\n")).await;

    let (_, body) = send_json(&with_key, post_json(&format!("/api/sessions/{id}/query"), json!({"question": "q?"}))).await;
    assert_eq!(body["status"], "answered");
    assert_eq!(provider.credentials(), vec!["configured-key".to_string()]);

    let provider = CannedProvider::new(answer_reply("ok"));
    let without_key = router_with(provider.clone(), None);
    let id = new_session(&without_key).await;
    send(&without_key, upload(&id, "rows.csv", "text/csv", b"a,1\n")).await;

    let (_, body) = send_json(&without_key, post_json(&format!("/api/sessions/{id}/query"), json!({"question": "q?"}))).await;
    assert_eq!(body["status"], "missing_input");
    assert_eq!(body["message"], MISSING_INPUT_MESSAGE);
    assert!(provider.credentials().is_empty());
}

#[tokio::test]
async fn test_quota_exceeded_leaves_transcript_unchanged() {
    let router = router_with(CannedProvider::new(ServiceReply::new(429, "slow down")), Some("k"));
    let id = new_session(&router).await;
    send(&router, upload(&id, "rows.csv", "text/csv", b"a,1\n")).await;

    let (status, body) = send_json(&router, post_json(&format!("/api/sessions/{id}/query"), json!({"question": "q?"}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["type"], "quota_exceeded");
    assert_eq!(body["error"]["message"], QUOTA_EXCEEDED_MESSAGE);

    let (_, body) = send_json(&router, get(&format!("/api/sessions/{id}"))).await;
    assert_eq!(body["transcript_len"], 0);
}

#[tokio::test]
async fn test_service_error_body_is_passed_through() {
    let router = router_with(CannedProvider::new(ServiceReply::new(503, "backend unavailable")), Some("k"));
    let id = new_session(&router).await;
    send(&router, upload(&id, "rows.csv", "text/csv", b"a,1\n")).await;

    let (status, body) = send_json(&router, post_json(&format!("/api/sessions/{id}/query"), json!({"question": "q?"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["message"], "backend unavailable");
}

#[tokio::test]
async fn test_rejected_uploads() {
    let router = router_with(CannedProvider::new(answer_reply("x")), None);
    let id = new_session(&router).await;

    let (status, body) = send_json(&router, upload(&id, "notes.txt", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "unsupported_type");

    let (status, body) = send_json(&router, upload(&id, "broken.pdf", "application/pdf", b"not a pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "extraction_error");

    let (_, body) = send_json(&router, get(&format!("/api/sessions/{id}"))).await;
    assert_eq!(body["has_context"], false);
}

#[tokio::test]
async fn test_unknown_session_and_format() {
    let router = router_with(CannedProvider::new(answer_reply("x")), None);

    let (status, body) = send_json(&router, get("/api/sessions/00000000-0000-0000-0000-000000000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");

    let id = new_session(&router).await;
    let (status, _) = send_json(&router, get(&format!("/api/sessions/{id}/export/html"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_are_isolated_and_deletable() {
    let router = router_with(CannedProvider::new(answer_reply("x")), Some("k"));
    let first = new_session(&router).await;
    let second = new_session(&router).await;

    send(&router, upload(&first, "rows.csv", "text/csv", b"a,1\n")).await;

    let (_, body) = send_json(&router, post_json(&format!("/api/sessions/{second}/query"), json!({"question": "q?"}))).await;
    assert_eq!(body["status"], "missing_document");

    let delete = Request::delete(format!("/api/sessions/{first}")).body(Body::empty()).unwrap();
    let (status, _, _) = send(&router, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&router, get(&format!("/api/sessions/{first}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
