//! Mock auth API client for testing
//!
//! Provides a mock implementation of [`AuthApi`] for unit testing the
//! session store without making real API calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::http::ApiResponse;
use super::models::{LoginCredentials, LoginResponse, TokenValidation};
use super::AuthApi;

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub validate_token: usize,
    pub logout: usize,
}

/// Mock API client for testing.
///
/// Configure responses via builder methods, then hand to a session store.
/// An optional login gate lets tests hold a login call in flight while the
/// session changes underneath it.
pub struct MockAuthClient {
    login_response: Mutex<ApiResponse<LoginResponse>>,
    validate_response: Mutex<ApiResponse<TokenValidation>>,
    logout_response: Mutex<ApiResponse<serde_json::Value>>,
    login_gate: Option<Arc<Semaphore>>,
    calls: Mutex<CallCounts>,
}

impl Default for MockAuthClient {
    fn default() -> Self {
        Self {
            login_response: Mutex::new(ApiResponse::error(Some(500), "no mock login response")),
            validate_response: Mutex::new(ApiResponse::ok(TokenValidation { valid: true }, 200)),
            logout_response: Mutex::new(ApiResponse::ok(serde_json::Value::Null, 200)),
            login_gate: None,
            calls: Mutex::new(CallCounts::default()),
        }
    }
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_response(self, response: ApiResponse<LoginResponse>) -> Self {
        *self.login_response.lock().unwrap() = response;
        self
    }

    pub fn with_validate_response(self, response: ApiResponse<TokenValidation>) -> Self {
        *self.validate_response.lock().unwrap() = response;
        self
    }

    pub fn with_logout_response(self, response: ApiResponse<serde_json::Value>) -> Self {
        *self.logout_response.lock().unwrap() = response;
        self
    }

    /// Make `login` wait on the semaphore before responding
    pub fn with_login_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.login_gate = Some(gate);
        self
    }

    pub fn call_counts(&self) -> CallCounts {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthClient {
    async fn login(&self, _credentials: &LoginCredentials) -> ApiResponse<LoginResponse> {
        self.calls.lock().unwrap().login += 1;

        if let Some(gate) = &self.login_gate {
            let permit = gate.acquire().await.expect("login gate closed");
            permit.forget();
        }

        self.login_response.lock().unwrap().clone()
    }

    async fn validate_token(&self, _token: &str) -> ApiResponse<TokenValidation> {
        self.calls.lock().unwrap().validate_token += 1;
        self.validate_response.lock().unwrap().clone()
    }

    async fn logout(&self) -> ApiResponse<serde_json::Value> {
        self.calls.lock().unwrap().logout += 1;
        self.logout_response.lock().unwrap().clone()
    }
}
