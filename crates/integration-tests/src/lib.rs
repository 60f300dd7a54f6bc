//! End-to-end tests for Bookstand.
//!
//! The clients are exercised against [`MockBackend`], an axum server bound to
//! an ephemeral local port. It records every request it receives and answers
//! from a table of canned responses, so tests can assert on the exact method,
//! path, query, headers and body a client operation produced.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstand-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Customer flows: auth header, catalog, cart, orders
//! - `admin` - Back-office flows: role check, guard, catalog events

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bookstand_client::{ClientConfig, ConfigError};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path prefix every backend route lives under.
pub const API_PREFIX: &str = "/api";

/// One request as seen by the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path with [`API_PREFIX`] stripped, e.g. `/cart/add`.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// JSON body, `None` for an empty body.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// The `Authorization` header value, if sent.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), Canned>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

/// A recording backend stand-in. The server stops when this is dropped.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = SharedState::default();

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL to point a client at, including [`API_PREFIX`].
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Client configuration for this backend with a short timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the generated URL is rejected.
    pub fn config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_values(Some(&self.base_url()), Some("5"))
    }

    /// Answer `method path` with a success envelope wrapping `data`.
    pub fn respond(&self, method: Method, path: &str, data: Value) {
        let envelope = json!({ "code": 200, "message": "success", "data": data });
        self.respond_raw(method, path, StatusCode::OK, &envelope.to_string());
    }

    /// Answer `method path` with a bodiless success envelope.
    pub fn respond_ok(&self, method: Method, path: &str) {
        let envelope = json!({ "code": 200, "message": "success" });
        self.respond_raw(method, path, StatusCode::OK, &envelope.to_string());
    }

    /// Answer `method path` with an error status and envelope.
    pub fn respond_error(&self, method: Method, path: &str, status: StatusCode, message: &str) {
        let envelope = json!({ "code": status.as_u16(), "message": message });
        self.respond_raw(method, path, status, &envelope.to_string());
    }

    /// Answer `method path` with an arbitrary status and body.
    pub fn respond_raw(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        lock(&self.state).routes.insert(
            (method, path.to_string()),
            Canned {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.state).requests.last().cloned()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock(state: &SharedState) -> std::sync::MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();
    let body = serde_json::from_slice(&body).ok();

    let mut state = lock(&state);
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    let canned = state.routes.get(&(method, path)).cloned().unwrap_or_else(|| Canned {
        status: StatusCode::NOT_FOUND,
        body: json!({ "code": 404, "message": "Not found" }).to_string(),
    });
    drop(state);

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}
