//! ClinAgenda API client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::http::{ApiResponse, HttpMediator};
use super::models::{LoginCredentials, LoginResponse, TokenValidation};
use super::AuthApi;
use crate::error::Result;

/// ClinAgenda API base URL
const API_BASE_URL: &str = "https://api.clinagenda.com/api/v1";

/// Query sent to the token validation endpoint
#[derive(Serialize)]
struct ValidateQuery<'a> {
    token: &'a str,
}

/// ClinAgenda API client
pub struct ClinAgendaClient {
    mediator: Arc<HttpMediator>,
}

impl ClinAgendaClient {
    /// Create a client against the production API
    pub fn new() -> Result<Self> {
        Self::with_host(None)
    }

    /// Create a client against a custom API host (development/testing)
    pub fn with_host(api_host: Option<String>) -> Result<Self> {
        let base_url = api_host.unwrap_or_else(|| API_BASE_URL.to_string());
        Ok(Self {
            mediator: Arc::new(HttpMediator::new(base_url)?),
        })
    }

    /// The mediator carrying this client's token slot and 401 hooks
    pub fn mediator(&self) -> &Arc<HttpMediator> {
        &self.mediator
    }
}

#[async_trait]
impl AuthApi for ClinAgendaClient {
    async fn login(&self, credentials: &LoginCredentials) -> ApiResponse<LoginResponse> {
        self.mediator
            .request(Method::POST, "auth/login", Some(credentials))
            .await
    }

    async fn validate_token(&self, token: &str) -> ApiResponse<TokenValidation> {
        self.mediator
            .request(
                Method::GET,
                "auth/validate-token",
                Some(&ValidateQuery { token }),
            )
            .await
    }

    async fn logout(&self) -> ApiResponse<serde_json::Value> {
        self.mediator
            .request(Method::POST, "auth/logout", None::<&()>)
            .await
    }
}
