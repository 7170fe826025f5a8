//! Dynamic table row

use super::Value;

/// An open-ended record shown as one table row.
///
/// Rows keep their fields in insertion order, which is the key order the
/// structured export writes. No schema is enforced: columns declare which
/// fields they read, and a missing field simply reads as `None`.
///
/// # Example
///
/// ```
/// use helpdesk_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", 42i64)
///     .set("title", "VPN drops every hour");
///
/// assert_eq!(row.get_str("title"), Some("VPN drops every hour"));
/// assert_eq!(row.id("id").as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub(crate) fields: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns the field as a string slice, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over field values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value, replacing an existing one in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(index).1)
    }

    /// Identifier of the row, read from `id_field` in display-string form.
    pub fn id(&self, id_field: &str) -> Option<String> {
        self.get(id_field).and_then(Value::display_string)
    }

    /// Converts into a JSON object, keeping field order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut row = Row::new().set("a", 1i64).set("b", 2i64);
        row.insert("a", 3i64);
        let names: Vec<&str> = row.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_missing_field_reads_as_none() {
        let row = Row::new().set("name", "Alpha");
        assert!(row.get("email").is_none());
        assert!(row.id("id").is_none());
    }

    #[test]
    fn test_remove() {
        let mut row = Row::new().set("a", 1i64).set("b", 2i64);
        assert_eq!(row.remove("a"), Some(Value::Int(1)));
        assert_eq!(row.len(), 1);
        assert_eq!(row.remove("a"), None);
    }
}
