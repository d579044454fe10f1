//! Common test utilities for integration tests.

#![allow(dead_code)]

use intake_bot::{AdminRelay, Dispatcher, Registrar};
use session_store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use telegram_client::{BotMessage, Content, FileId, TelegramClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "123:test-token";
pub const ADMIN: i64 = 99;

/// Everything wired against a mock Bot API.
pub struct TestBot {
    pub server: MockServer,
    pub sessions: SessionStore,
    pub registrar: Arc<Registrar>,
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn test_bot() -> TestBot {
    let server = MockServer::start().await;
    let telegram = Arc::new(
        TelegramClient::new(server.uri(), TOKEN, Duration::from_secs(5)).unwrap(),
    );

    let sessions = SessionStore::new();
    let relay = AdminRelay::new(telegram.clone(), ADMIN);
    let registrar = Arc::new(Registrar::new(sessions.clone(), relay));
    let dispatcher = Arc::new(Dispatcher::with_registrar(telegram, registrar.clone()));

    TestBot {
        server,
        sessions,
        registrar,
        dispatcher,
    }
}

pub fn api_path(method_name: &str) -> String {
    format!("/bot{}/{}", TOKEN, method_name)
}

pub fn ok_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({ "ok": true, "result": { "message_id": 1 } }))
}

pub fn error_response() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(serde_json::json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: chat not found"
    }))
}

/// Accept every sendMessage call.
pub async fn accept_messages(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ok_response())
        .mount(server)
        .await;
}

pub fn text_message(participant: i64, text: &str) -> BotMessage {
    BotMessage {
        participant,
        chat_id: participant,
        sender_name: "Jane".into(),
        content: Content::Text(text.into()),
        timestamp: 1700000000,
    }
}

pub fn photo_message(participant: i64, file_id: &str) -> BotMessage {
    BotMessage {
        participant,
        chat_id: participant,
        sender_name: "Jane".into(),
        content: Content::Photo(FileId::new(file_id)),
        timestamp: 1700000000,
    }
}

/// Wait until every queued message has been handled.
pub async fn wait_idle(dispatcher: &Dispatcher) {
    for _ in 0..500 {
        if dispatcher.busy_participants() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("dispatcher still busy");
}
