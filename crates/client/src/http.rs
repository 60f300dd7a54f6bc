//! The HTTP client adapter shared by every resource module.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::api::{addresses::Addresses, books::Books, cart::Carts, orders::Orders, users::Users};
use crate::config::ClientConfig;
use crate::envelope::{Envelope, Payload};
use crate::error::ApiError;
use crate::session::Session;

/// One backend call, described before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Append a query parameter when `value` is `Some`.
    #[must_use]
    pub fn query_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestConstruction` if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::RequestConstruction(format!("unserializable body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Client for the Bookstand REST backend.
///
/// Cloning is cheap; all clones share the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestConstruction` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::RequestConstruction(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// Session this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Absolute URL for a relative path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub const fn books(&self) -> Books<'_> {
        Books::new(self)
    }

    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    #[must_use]
    pub const fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    #[must_use]
    pub const fn carts(&self) -> Carts<'_> {
        Carts::new(self)
    }

    #[must_use]
    pub const fn addresses(&self) -> Addresses<'_> {
        Addresses::new(self)
    }

    /// Send a request and unwrap the response envelope.
    ///
    /// The bearer token is read from the session on every call, so a login
    /// or logout takes effect on the next request.
    ///
    /// # Errors
    ///
    /// - `ApiError::Server` for any non-2xx status, carrying the raw body
    /// - `ApiError::Connectivity` when no response arrives
    /// - `ApiError::RequestConstruction` when the request cannot be built
    /// - `ApiError::Shape` when a 2xx body is not an envelope
    ///
    /// Every error is logged here before it is returned.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Payload, ApiError> {
        let url = self.url(&request.path);
        let method = request.method.clone();

        self.send(request, &url).await.inspect_err(|e| e.log(&method, &url))
    }

    async fn send(&self, request: ApiRequest, url: &str) -> Result<Payload, ApiError> {
        let mut builder = self.inner.client.request(request.method, url);

        if let Some(token) = self.inner.session.token() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if !status.is_success() {
            return Err(ApiError::Server {
                status,
                message: Envelope::message_of(&body),
                body,
            });
        }

        let envelope = Envelope::parse(&body)?;
        Ok(Payload::new(envelope.data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::from_values(Some(base), None).unwrap();
        ApiClient::new(&config, Session::in_memory()).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let api = client("http://localhost:5000/api");
        assert_eq!(api.url("/books"), "http://localhost:5000/api/books");
        assert_eq!(api.url("books/3"), "http://localhost:5000/api/books/3");
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let api = client("http://localhost:5000/api/");
        assert_eq!(api.url("/cart/add"), "http://localhost:5000/api/cart/add");
    }

    #[test]
    fn test_url_with_root_base() {
        let api = client("http://localhost:5000");
        assert_eq!(api.url("/login"), "http://localhost:5000/login");
    }

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::get("/books/search")
            .query("q", "rust")
            .query_opt("category", None::<&str>)
            .query_opt("page", Some(2));
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.query,
            vec![("q", "rust".to_string()), ("page", "2".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn test_request_json_body() {
        let req = ApiRequest::put("/orders/4/status")
            .json(&json!({"status": "shipping"}))
            .unwrap();
        assert_eq!(req.body, Some(json!({"status": "shipping"})));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connectivity_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let api = client(&format!("http://127.0.0.1:{port}/api"));
        let err = api.execute(ApiRequest::get("/books")).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Connectivity);
    }
}
