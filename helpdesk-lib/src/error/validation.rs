//! Field-level validation error map

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Validation messages keyed by field name.
///
/// One message per invalid field. Both local validation and server-rejected
/// submissions produce this shape, so the form treats them identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Removes the message for a field. Returns `true` if one existed.
    pub fn remove(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    /// Merges `other` into `self`; messages in `other` win.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a server validation payload.
    ///
    /// Accepts `{"errors": {...}}` or a bare field map. A field may carry a
    /// single message or a list of messages; only the first one is kept.
    pub fn from_json(payload: &serde_json::Value) -> Option<Self> {
        let map = payload
            .get("errors")
            .unwrap_or(payload)
            .as_object()?;

        let mut errors = FieldErrors::new();
        for (field, messages) in map {
            let message = match messages {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(items) => {
                    items.iter().find_map(|item| item.as_str().map(str::to_string))
                }
                _ => None,
            };
            if let Some(message) = message {
                errors.insert(field.clone(), message);
            }
        }
        Some(errors)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (field, message) in iter {
            errors.insert(field, message);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_takes_first_message() {
        let payload = serde_json::json!({
            "message": "The given data was invalid.",
            "errors": {
                "email": ["The email has already been taken.", "Second"],
                "name": "The name field is required."
            }
        });
        let errors = FieldErrors::from_json(&payload).unwrap();
        assert_eq!(errors.get("email"), Some("The email has already been taken."));
        assert_eq!(errors.get("name"), Some("The name field is required."));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_from_json_bare_map() {
        let payload = serde_json::json!({"title": "Too short"});
        let errors = FieldErrors::from_json(&payload).unwrap();
        assert_eq!(errors.get("title"), Some("Too short"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(FieldErrors::from_json(&serde_json::json!([1, 2])).is_none());
    }
}
