//! In-memory backend for offline use and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

use super::Backend;
use super::BackendRequest;
use super::Method;
use crate::error::BridgeError;
use crate::error::FieldErrors;

/// A [`Backend`] holding JSON resources in memory.
///
/// Collections are JSON arrays of objects with an `id`. Writes follow the
/// usual REST shape: `POST coll` appends, `PUT`/`PATCH coll/{id}` merges
/// fields into the row, `DELETE coll/{id}` removes it. Every request is
/// recorded, and a resource can be primed to reject writes with field errors.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    resources: RwLock<HashMap<String, serde_json::Value>>,
    rejections: RwLock<HashMap<String, FieldErrors>>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert) for setup code.
    pub fn with_resource(mut self, resource: impl Into<String>, value: serde_json::Value) -> Self {
        self.resources.get_mut().insert(resource.into(), value);
        self
    }

    /// Stores or replaces a resource.
    pub async fn insert(&self, resource: impl Into<String>, value: serde_json::Value) {
        self.resources.write().await.insert(resource.into(), value);
    }

    /// Makes every write to `resource` fail with `errors`.
    pub async fn reject(&self, resource: impl Into<String>, errors: FieldErrors) {
        self.rejections.write().await.insert(resource.into(), errors);
    }

    /// Stops rejecting writes to `resource`.
    pub async fn accept(&self, resource: &str) {
        self.rejections.write().await.remove(resource);
    }

    /// Requests sent so far, oldest first.
    pub async fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().await.clone()
    }
}

fn split_resource(resource: &str) -> (&str, Option<&str>) {
    let resource = resource.trim_matches('/');
    match resource.rsplit_once('/') {
        Some((collection, id)) => (collection, Some(id)),
        None => (resource, None),
    }
}

fn id_matches(row: &serde_json::Value, id: &str) -> bool {
    match row.get("id") {
        Some(serde_json::Value::String(s)) => s == id,
        Some(serde_json::Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn next_id(rows: &[serde_json::Value]) -> i64 {
    rows.iter()
        .filter_map(|row| row.get("id").and_then(serde_json::Value::as_i64))
        .max()
        .unwrap_or(0)
        + 1
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, BridgeError> {
        let resources = self.resources.read().await;
        if let Some(value) = resources.get(resource.trim_matches('/')) {
            return Ok(value.clone());
        }
        // coll/{id} reads a single row
        let (collection, id) = split_resource(resource);
        resources
            .get(collection)
            .and_then(|rows| rows.as_array())
            .zip(id)
            .and_then(|(rows, id)| rows.iter().find(|row| id_matches(row, id)).cloned())
            .ok_or_else(|| BridgeError::NotFound(resource.to_string()))
    }

    async fn send(&self, request: BackendRequest) -> Result<serde_json::Value, BridgeError> {
        debug!("memory backend: {} {}", request.method.as_str(), request.resource);
        self.requests.lock().await.push(request.clone());

        if let Some(errors) = self.rejections.read().await.get(request.resource.trim_matches('/')) {
            return Err(BridgeError::Validation(errors.clone()));
        }

        let mut resources = self.resources.write().await;
        let (collection, id) = split_resource(&request.resource);

        match (request.method, id) {
            (Method::Post, _) => {
                let key = request.resource.trim_matches('/').to_string();
                let rows = resources
                    .entry(key)
                    .or_insert_with(|| serde_json::Value::Array(Vec::new()));
                let Some(rows) = rows.as_array_mut() else {
                    return Err(BridgeError::http(405, "resource is not a collection"));
                };
                let mut created = request.payload;
                if let Some(object) = created.as_object_mut()
                    && !object.contains_key("id")
                {
                    object.insert("id".to_string(), serde_json::Value::from(next_id(rows)));
                }
                rows.push(created.clone());
                Ok(created)
            }
            (Method::Put | Method::Patch, Some(id)) => {
                let row = resources
                    .get_mut(collection)
                    .and_then(|rows| rows.as_array_mut())
                    .and_then(|rows| rows.iter_mut().find(|row| id_matches(row, id)))
                    .ok_or_else(|| BridgeError::NotFound(request.resource.clone()))?;
                if let (Some(target), Some(changes)) =
                    (row.as_object_mut(), request.payload.as_object())
                {
                    for (key, value) in changes {
                        target.insert(key.clone(), value.clone());
                    }
                }
                Ok(row.clone())
            }
            (Method::Delete, Some(id)) => {
                let rows = resources
                    .get_mut(collection)
                    .and_then(|rows| rows.as_array_mut())
                    .ok_or_else(|| BridgeError::NotFound(request.resource.clone()))?;
                let before = rows.len();
                rows.retain(|row| !id_matches(row, id));
                if rows.len() == before {
                    return Err(BridgeError::NotFound(request.resource.clone()));
                }
                Ok(serde_json::Value::Null)
            }
            _ => Err(BridgeError::http(
                405,
                format!("{} not supported on {}", request.method.as_str(), request.resource),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_resource(
            "tickets",
            json!([{"id": 1, "title": "VPN"}, {"id": 2, "title": "Printer"}]),
        )
    }

    #[tokio::test]
    async fn test_fetch_collection_and_row() {
        let backend = backend();
        let all = backend.fetch("tickets").await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);
        let one = backend.fetch("tickets/2").await.unwrap();
        assert_eq!(one["title"], "Printer");
        assert!(matches!(
            backend.fetch("tickets/9").await,
            Err(BridgeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_post_assigns_next_id() {
        let backend = backend();
        let created = backend
            .send(BackendRequest::post("tickets", json!({"title": "Email"})))
            .await
            .unwrap();
        assert_eq!(created["id"], 3);
        assert_eq!(backend.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_patch_and_delete() {
        let backend = backend();
        let updated = backend
            .send(BackendRequest::patch("tickets/1", json!({"status": "closed"})))
            .await
            .unwrap();
        assert_eq!(updated, json!({"id": 1, "title": "VPN", "status": "closed"}));

        backend.send(BackendRequest::delete("tickets/1")).await.unwrap();
        assert_eq!(backend.fetch("tickets").await.unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection() {
        let backend = backend();
        backend
            .reject("tickets", FieldErrors::new().with("title", "Duplicate"))
            .await;
        let error = backend
            .send(BackendRequest::post("tickets", json!({"title": "VPN"})))
            .await
            .unwrap_err();
        assert_eq!(error.field_errors().unwrap().get("title"), Some("Duplicate"));
    }
}
