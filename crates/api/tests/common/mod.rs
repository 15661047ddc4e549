#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tidings_api::config::ServerConfig;
use tidings_api::router::build_app_router;
use tidings_api::state::AppState;
use tidings_events::{
    Dispatcher, Hooks, MailTransport, NotificationConfig, NotificationRegistry, OutgoingMail,
};

/// Transport double that records every message it is handed.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, mail: &OutgoingMail) -> bool {
        self.sent.lock().unwrap().push(mail.clone());
        true
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    }
}

/// Notification settings with an admin recipient configured.
pub fn notification_config() -> NotificationConfig {
    NotificationConfig {
        admin_email: vec!["admin@example.com".to_string()],
        ..NotificationConfig::default()
    }
}

/// Build an `AppState` whose dispatcher sends through a recording transport.
pub fn test_state(config: &NotificationConfig) -> (AppState, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let shared: Arc<dyn MailTransport> = transport.clone();
    let dispatcher = Dispatcher::new(
        NotificationRegistry::with_builtins(config),
        Hooks::from_config(config),
        shared,
    );
    (AppState::new(test_config(), dispatcher), transport)
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(config: &NotificationConfig) -> (Router, Arc<RecordingTransport>) {
    let (state, transport) = test_state(config);
    (build_app_router(state), transport)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
