//! Mock Telegram Bot API
//!
//! Accepts any POST, records the path and JSON body, and answers with a
//! fixed status. Each test gets its own server on a random port.

#![allow(dead_code)]

use super::constants::*;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::{Json, Router};
use deeppi_catalog::TelegramClient;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
}

async fn record(State(state): State<MockState>, uri: Uri, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        body,
    });
    let ok = state.status.is_success();
    (state.status, Json(json!({ "ok": ok })))
}

pub struct MockTelegram {
    /// Base URL for the client (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl MockTelegram {
    pub async fn spawn() -> Self {
        Self::spawn_with_status(StatusCode::OK).await
    }

    pub async fn spawn_with_status(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(vec![]));
        let state = MockState {
            requests: requests.clone(),
            status,
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock Telegram server failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn client(&self) -> TelegramClient {
        TelegramClient::new(
            self.base_url.clone(),
            BOT_TOKEN.to_string(),
            CHANNEL_ID.to_string(),
            5,
        )
        .expect("Failed to build Telegram client")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}
