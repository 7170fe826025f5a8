//! Backend bridge error types

use super::FieldErrors;

/// Errors returned by a [`Backend`](crate::bridge::Backend) call.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The backend rejected the payload with per-field messages.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// HTTP error response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network error during the call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL or resource path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The requested resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Failed to parse the backend response.
    #[error("Response parse error: {0}")]
    Parse(String),
}

impl BridgeError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Validation(_) => Some(422),
            _ => None,
        }
    }

    /// Returns the field errors if the backend rejected the payload.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
