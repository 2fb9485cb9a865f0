//! ClinAgenda API client

use async_trait::async_trait;

pub mod clinagenda;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use clinagenda::ClinAgendaClient;
pub use http::{ApiResponse, BearerToken, HttpMediator, NavigationSink, UnauthorizedHandler};
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockAuthClient;
pub use models::{LoginCredentials, LoginResponse, TokenValidation, UserIdentity};

/// Authentication operations for the ClinAgenda API.
///
/// All methods return the mediator's normalized response; callers branch on
/// `is_error` rather than handling transport errors.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and user identity
    async fn login(&self, credentials: &LoginCredentials) -> ApiResponse<LoginResponse>;

    /// Ask the server whether a token is still valid
    async fn validate_token(&self, token: &str) -> ApiResponse<TokenValidation>;

    /// Invalidate the current token server-side
    async fn logout(&self) -> ApiResponse<serde_json::Value>;
}
