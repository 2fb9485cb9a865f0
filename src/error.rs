//! Error types for the ClinAgenda session core

use thiserror::Error;

/// Result type alias for ClinAgenda operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Run `clinagenda login` to sign in.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("No response from server")]
    NoResponse,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            // Request went out, nothing came back
            ApiError::NoResponse
        } else if err.is_builder() {
            // Request never left the process
            ApiError::Request(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Durable session-store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session store not found. Run `clinagenda login` to sign in.")]
    NotFound,

    #[error("Failed to parse session store: {0}")]
    ParseError(String),

    #[error("Invalid session store: {0}")]
    Invalid(String),

    #[error("Failed to save session store: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::ParseError(err.to_string())
    }
}
