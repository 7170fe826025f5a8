//! HTTP backend over reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::StatusCode;
use url::Url;

use super::Backend;
use super::BackendRequest;
use super::Method;
use crate::error::BridgeError;
use crate::error::FieldErrors;

/// A [`Backend`] speaking JSON over HTTP.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use helpdesk_lib::bridge::HttpBackend;
///
/// let backend = HttpBackend::builder("https://helpdesk.example.com/api")
///     .token("session-token")
///     .timeout(Duration::from_secs(15))
///     .build()?;
/// let tickets = backend.fetch("tickets").await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

#[derive(Debug)]
struct HttpBackendInner {
    base_url: Url,
    token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpBackend {
    /// Creates a new builder for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> HttpBackendBuilder {
        HttpBackendBuilder::new(base_url)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolves a resource path against the base URL.
    pub fn url_for(&self, resource: &str) -> Result<Url, BridgeError> {
        self.inner
            .base_url
            .join(resource.trim_start_matches('/'))
            .map_err(|e| BridgeError::InvalidUrl(format!("{resource}: {e}")))
    }

    async fn execute(
        &self,
        method: Method,
        resource: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, BridgeError> {
        let url = self.url_for(resource)?;
        debug!("{} {}", method.as_str(), url);

        let mut request = self
            .inner
            .http_client
            .request(to_reqwest(method), url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(payload) = payload.filter(|p| !p.is_null()) {
            request = request.json(&payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return serde_json::from_str(&body)
                .map_err(|e| BridgeError::Parse(format!("{e} in response to {resource}")));
        }

        warn!("{} {} failed with {}", method.as_str(), resource, status);
        Err(error_from_response(status, resource, &body))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Maps a failed response to a [`BridgeError`].
///
/// 422 bodies carrying field messages become [`BridgeError::Validation`].
fn error_from_response(status: StatusCode, resource: &str, body: &str) -> BridgeError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if status == StatusCode::UNPROCESSABLE_ENTITY
        && let Some(errors) = json.as_ref().and_then(FieldErrors::from_json)
        && !errors.is_empty()
    {
        return BridgeError::Validation(errors);
    }
    if status == StatusCode::NOT_FOUND {
        return BridgeError::NotFound(resource.to_string());
    }

    let message = json
        .as_ref()
        .and_then(|j| j.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    BridgeError::http(status.as_u16(), message)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, BridgeError> {
        self.execute(Method::Get, resource, None).await
    }

    async fn send(&self, request: BackendRequest) -> Result<serde_json::Value, BridgeError> {
        self.execute(request.method, &request.resource, Some(request.payload))
            .await
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`HttpBackend`].
#[derive(Debug)]
pub struct HttpBackendBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpBackendBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
            http_client: None,
        }
    }

    /// Bearer token of the current session.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the backend. Fails if the base URL does not parse.
    pub fn build(self) -> Result<HttpBackend, BridgeError> {
        // Url::join replaces the last segment unless the base ends with '/'
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).map_err(|e| BridgeError::InvalidUrl(format!("{base}: {e}")))?;

        Ok(HttpBackend {
            inner: Arc::new(HttpBackendInner {
                base_url,
                token: self.token,
                http_client: self.http_client.unwrap_or_default(),
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_keeps_base_path() {
        let backend = HttpBackend::builder("https://helpdesk.example.com/api")
            .build()
            .unwrap();
        assert_eq!(
            backend.url_for("/tickets/4/assign").unwrap().as_str(),
            "https://helpdesk.example.com/api/tickets/4/assign"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::builder("not a url").build(),
            Err(BridgeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_422_becomes_validation_error() {
        let body = r#"{"message": "invalid", "errors": {"email": ["Taken"]}}"#;
        let error = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, "users", body);
        let errors = error.field_errors().unwrap();
        assert_eq!(errors.get("email"), Some("Taken"));
    }

    #[test]
    fn test_other_statuses() {
        let error = error_from_response(StatusCode::FORBIDDEN, "users", r#"{"message": "Nope"}"#);
        assert_eq!(error.status_code(), Some(403));
        assert_eq!(error.to_string(), "HTTP 403: Nope");

        let error = error_from_response(StatusCode::NOT_FOUND, "tickets/9", "");
        assert!(matches!(error, BridgeError::NotFound(r) if r == "tickets/9"));

        let error = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, "users", "oops");
        assert_eq!(error.status_code(), Some(422));
        assert!(matches!(error, BridgeError::Http { .. }));
    }
}
