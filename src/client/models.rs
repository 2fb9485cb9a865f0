//! Wire models for the ClinAgenda auth API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: u64,

    pub username: String,

    pub email: String,

    /// Bearer token for subsequent requests
    pub token: String,

    #[serde(default)]
    pub roles: Vec<String>,

    /// Token expiration time
    pub token_expires: DateTime<Utc>,

    /// Server-provided message, present on some error payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Verdict from the token validation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenValidation {
    pub valid: bool,
}

/// Identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: u64,

    pub username: String,

    pub email: String,

    #[serde(default)]
    pub roles: Vec<String>,

    /// Display name, when the account has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserIdentity {
    /// Up to two initials from the display name, falling back to the
    /// username; `"?"` when neither yields anything.
    pub fn initials(&self) -> String {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username);

        let initials: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();

        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

impl From<&LoginResponse> for UserIdentity {
    fn from(response: &LoginResponse) -> Self {
        Self {
            user_id: response.user_id,
            username: response.username.clone(),
            email: response.email.clone(),
            roles: response.roles.clone(),
            name: None,
            avatar: None,
        }
    }
}
