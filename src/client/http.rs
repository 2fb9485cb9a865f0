//! HTTP request mediator
//!
//! Uniform request dispatch for the ClinAgenda API: a bearer token slot
//! applied to every outgoing request, response normalization into
//! [`ApiResponse`] so callers branch on `is_error` instead of matching
//! errors, and the cross-cutting 401 reaction (session teardown + forced
//! navigation to the login page) regardless of which call produced it.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::guard::LOGIN_PATH;

/// Request timeout for all API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Normalized response shape shared by all mediated calls
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub is_error: bool,
    pub data: Option<T>,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, status_code: u16) -> Self {
        Self {
            is_error: false,
            data: Some(data),
            status_code: Some(status_code),
            message: None,
        }
    }

    pub fn error(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            data: None,
            status_code,
            message: Some(message.into()),
        }
    }
}

/// Shared slot holding the current bearer token.
///
/// The session store writes it; the mediator reads it in a before-send hook.
/// No token means the Authorization header is omitted entirely.
#[derive(Clone, Default)]
pub struct BearerToken {
    token: Arc<RwLock<Option<String>>>,
}

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: &str) {
        *self.token.write().unwrap() = Some(token.to_string());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }
}

/// Receiver for the global 401 reaction.
///
/// `current_path` is the path the client was displaying when the 401
/// arrived, so the handler can remember it for a post-login redirect.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, current_path: Option<&str>);
}

/// Forced-navigation sink, provided by the embedding router
pub trait NavigationSink: Send + Sync {
    fn force_navigate(&self, path: &str);

    /// Path currently displayed, when the embedder tracks one
    fn current_path(&self) -> Option<String> {
        None
    }
}

/// Navigation sink for headless embedders; records the demand in the log
pub struct LogNavigationSink;

impl NavigationSink for LogNavigationSink {
    fn force_navigate(&self, path: &str) {
        log::info!("Forced navigation to {}", path);
    }
}

/// Error payload shape the API uses for non-2xx responses
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP request mediator for the ClinAgenda API
pub struct HttpMediator {
    http: HttpClient,
    base_url: String,
    bearer: BearerToken,
    unauthorized: RwLock<Option<Arc<dyn UnauthorizedHandler>>>,
    navigation: RwLock<Option<Arc<dyn NavigationSink>>>,
}

impl HttpMediator {
    /// Create a mediator for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            bearer: BearerToken::new(),
            unauthorized: RwLock::new(None),
            navigation: RwLock::new(None),
        })
    }

    /// Handle to the bearer token slot, shared with the session store
    pub fn bearer(&self) -> BearerToken {
        self.bearer.clone()
    }

    /// Install the session teardown handler invoked on any 401 response.
    ///
    /// Set after the session store is constructed, since the store itself
    /// needs the client.
    pub fn set_unauthorized_handler(&self, handler: Arc<dyn UnauthorizedHandler>) {
        *self.unauthorized.write().unwrap() = Some(handler);
    }

    /// Install the navigation sink used for the forced login redirect
    pub fn set_navigation_sink(&self, sink: Arc<dyn NavigationSink>) {
        *self.navigation.write().unwrap() = Some(sink);
    }

    /// Dispatch a request and normalize the outcome.
    ///
    /// `GET` bodies are encoded as query parameters; everything else is sent
    /// as JSON. Never returns `Err` for transport or status failures; those
    /// surface through the `is_error` branch of the response.
    pub async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        let mut builder = self.http.request(method.clone(), &url);

        // Before-send hook: attach the bearer token when one is present
        if let Some(token) = self.bearer.get() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            builder = if method == Method::GET {
                builder.query(body)
            } else {
                builder.json(body)
            };
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return Self::normalize_transport_error(err),
        };

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = Self::extract_message(response).await;
            self.handle_unauthorized();
            return ApiResponse::error(
                Some(status.as_u16()),
                message.unwrap_or_else(|| ApiError::Unauthorized.to_string()),
            );
        }

        if status.is_success() {
            return match response.json::<T>().await {
                Ok(data) => ApiResponse::ok(data, status.as_u16()),
                Err(e) => ApiResponse::error(
                    Some(status.as_u16()),
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                        .to_string(),
                ),
            };
        }

        // Server responded with an error status: surface its message
        let message = Self::extract_message(response).await.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        ApiResponse::error(Some(status.as_u16()), message)
    }

    /// Map a reqwest error to the "no response" or "request never sent"
    /// failure shape; neither carries a status code
    fn normalize_transport_error<T>(err: reqwest::Error) -> ApiResponse<T> {
        ApiResponse::error(None, ApiError::from(err).to_string())
    }

    /// Pull the server-provided message out of an error body, if any
    async fn extract_message(response: reqwest::Response) -> Option<String> {
        let text = response.text().await.ok()?;
        if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
            if let Some(message) = body.message {
                return Some(message);
            }
        }
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Global 401 reaction: drop the token, tear down the session, and
    /// force navigation to the login page
    fn handle_unauthorized(&self) {
        log::info!("Received 401, tearing down session");

        self.bearer.clear();

        let navigation = self.navigation.read().unwrap().clone();
        let current_path = navigation.as_ref().and_then(|nav| nav.current_path());

        if let Some(handler) = self.unauthorized.read().unwrap().clone() {
            handler.on_unauthorized(current_path.as_deref());
        }

        if let Some(nav) = navigation {
            nav.force_navigate(LOGIN_PATH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        calls: Mutex<Vec<Option<String>>>,
    }

    impl UnauthorizedHandler for RecordingHandler {
        fn on_unauthorized(&self, current_path: Option<&str>) {
            self.calls
                .lock()
                .unwrap()
                .push(current_path.map(String::from));
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        navigations: Mutex<Vec<String>>,
        path: Option<String>,
    }

    impl NavigationSink for RecordingSink {
        fn force_navigate(&self, path: &str) {
            self.navigations.lock().unwrap().push(path.to_string());
        }

        fn current_path(&self) -> Option<String> {
            self.path.clone()
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Pong {
        pong: bool,
    }

    #[tokio::test]
    async fn test_success_response_is_normalized() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(r#"{"pong": true}"#)
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;

        assert!(!response.is_error);
        assert_eq!(response.status_code, Some(200));
        assert!(response.data.unwrap().pong);
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .with_status(500)
            .with_body(r#"{"message": "database offline"}"#)
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;

        assert!(response.is_error);
        assert_eq!(response.status_code, Some(500));
        assert_eq!(response.message.as_deref(), Some("database offline"));
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_no_response_has_fixed_message_and_no_status() {
        // Nothing listens on this port
        let mediator = HttpMediator::new("http://127.0.0.1:9").unwrap();
        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;

        assert!(response.is_error);
        assert_eq!(response.status_code, None);
        assert_eq!(response.message.as_deref(), Some("No response from server"));
    }

    #[tokio::test]
    async fn test_bearer_header_attached_when_token_set() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body(r#"{"pong": true}"#)
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        mediator.bearer().set("tok-123");

        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;
        assert!(!response.is_error);
    }

    #[tokio::test]
    async fn test_header_omitted_without_token() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"pong": true}"#)
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;
        assert!(!response.is_error);
    }

    #[tokio::test]
    async fn test_unauthorized_triggers_teardown_and_login_redirect() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/appointments")
            .with_status(401)
            .with_body(r#"{"message": "token expired"}"#)
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        mediator.bearer().set("stale");

        let handler = Arc::new(RecordingHandler::default());
        let sink = Arc::new(RecordingSink {
            navigations: Mutex::new(Vec::new()),
            path: Some("/appointments".to_string()),
        });
        mediator.set_unauthorized_handler(handler.clone());
        mediator.set_navigation_sink(sink.clone());

        let response: ApiResponse<Pong> = mediator
            .request(Method::GET, "appointments", None::<&()>)
            .await;

        assert!(response.is_error);
        assert_eq!(response.status_code, Some(401));
        assert_eq!(mediator.bearer().get(), None);
        assert_eq!(
            *handler.calls.lock().unwrap(),
            vec![Some("/appointments".to_string())]
        );
        assert_eq!(
            *sink.navigations.lock().unwrap(),
            vec![LOGIN_PATH.to_string()]
        );
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let mediator = HttpMediator::new(server.url()).unwrap();
        let response: ApiResponse<Pong> = mediator.request(Method::GET, "ping", None::<&()>).await;

        assert!(response.is_error);
        assert_eq!(response.status_code, Some(200));
        assert!(response.message.unwrap().contains("Invalid API response"));
    }
}
