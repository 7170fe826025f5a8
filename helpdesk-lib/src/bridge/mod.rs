//! Request/response bridge to the helpdesk backend.
//!
//! Persistence, authentication and every business rule (approval routing,
//! assignment, status transitions) live behind this trait. Tables call
//! [`Backend::fetch`] for their rows; forms and row actions call
//! [`Backend::send`].

mod http;
mod memory;

pub use http::HttpBackend;
pub use http::HttpBackendBuilder;
pub use memory::MemoryBackend;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::BridgeError;

/// HTTP-style verb of a backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A write sent to the backend: create, update, assign, delete and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    /// Resource path relative to the backend root, e.g. `tickets/12/assign`.
    pub resource: String,
    pub payload: serde_json::Value,
}

impl BackendRequest {
    pub fn new(method: Method, resource: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            method,
            resource: resource.into(),
            payload,
        }
    }

    pub fn post(resource: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(Method::Post, resource, payload)
    }

    pub fn put(resource: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(Method::Put, resource, payload)
    }

    pub fn patch(resource: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(Method::Patch, resource, payload)
    }

    pub fn delete(resource: impl Into<String>) -> Self {
        Self::new(Method::Delete, resource, serde_json::Value::Null)
    }
}

/// The server-side collaborator.
///
/// Implementations report rejected payloads as
/// [`BridgeError::Validation`] so forms can show the messages inline.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use helpdesk_lib::bridge::{Backend, BackendRequest};
/// use helpdesk_lib::error::BridgeError;
///
/// struct Offline;
///
/// #[async_trait]
/// impl Backend for Offline {
///     async fn fetch(&self, _resource: &str) -> Result<serde_json::Value, BridgeError> {
///         Ok(serde_json::json!([]))
///     }
///
///     async fn send(&self, request: BackendRequest) -> Result<serde_json::Value, BridgeError> {
///         Err(BridgeError::http(503, format!("offline: {}", request.resource)))
///     }
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// Reads a resource, typically a list of rows or lookups.
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, BridgeError>;

    /// Sends a write and returns the backend's response body.
    async fn send(&self, request: BackendRequest) -> Result<serde_json::Value, BridgeError>;
}
