#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cinema_booking::api_client::ApiClient;
use cinema_booking::notifications::{Notification, Snackbar};
use cinema_booking::services::session::AuthSession;
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct TestContext {
    pub server: MockServer,
    pub api: ApiClient,
    pub session: Arc<AuthSession>,
    pub snackbar: Arc<Snackbar>,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let api = ApiClient::new(&server.uri(), Duration::from_secs(5))
            .expect("Failed to build API client");
        Self {
            server,
            api,
            session: Arc::new(AuthSession::in_memory()),
            snackbar: Arc::new(Snackbar::default()),
        }
    }

    pub fn logged_in(self, token: &str) -> Self {
        self.session
            .login(token, "Ann")
            .expect("Failed to store token");
        self
    }

    pub fn last_message(&self) -> Option<Notification> {
        self.snackbar.last()
    }

    /// Сколько запросов с данным методом и путем получил сервер.
    pub async fn requests_to(&self, method: &str, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .count()
    }
}

pub fn seat_json(id: i64, studio_id: i64, number: &str, available: bool) -> Value {
    json!({
        "id": id,
        "studio_id": studio_id,
        "seat_number": number,
        "is_available": available
    })
}

pub fn booking_json(qr_code: Option<&str>) -> Value {
    let mut body = json!({
        "booking": {
            "id": 77,
            "booking_code": "BK-77",
            "studio_id": 1,
            "seat_ids": [2, 1],
            "qr_code": qr_code,
            "booking_type": "online",
            "status": "active"
        }
    });
    if let Some(qr) = qr_code {
        body["qrCode"] = json!(qr);
    }
    body
}
