//! In-process rerank endpoint for served-backend tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const RERANK_PATH: &str = "/api/rerank";

/// How the mock answers every request.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Documents in request order, scored 1.0, 0.9, 0.8, ... and cut to `top_n`.
    Echo,
    /// Fixed JSON body with status 200.
    Fixed(Value),
    /// Fixed raw body with the given status.
    Status(u16, String),
    /// Sleeps before answering like [`MockBehavior::Echo`].
    Slow(Duration),
}

#[derive(Clone)]
struct MockState {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, RERANK_PATH)
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_mock_server(behavior: MockBehavior) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Mock server has no address");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        behavior,
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route(RERANK_PATH, post(rerank))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Mock server failed");
    });

    MockServer {
        addr,
        requests,
        shutdown_tx: Some(shutdown_tx),
        _handle: handle,
    }
}

/// An address nothing listens on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}{}", addr, RERANK_PATH)
}

async fn rerank(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body.clone());

    match state.behavior {
        MockBehavior::Echo => Json(echo(&body)).into_response(),
        MockBehavior::Fixed(value) => Json(value).into_response(),
        MockBehavior::Status(status, text) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, text).into_response()
        }
        MockBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(echo(&body)).into_response()
        }
    }
}

fn echo(body: &Value) -> Value {
    let documents: Vec<&str> = body["documents"]
        .as_array()
        .map(|docs| docs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let top_n = body["top_n"]
        .as_u64()
        .map_or(documents.len(), |n| n as usize);

    let results: Vec<Value> = documents
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(index, doc)| {
            json!({
                "index": index,
                "document": doc,
                "relevance_score": 1.0 - 0.1 * index as f64,
            })
        })
        .collect();

    json!({ "results": results })
}
