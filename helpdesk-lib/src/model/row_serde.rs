//! Order-preserving serialization for Row.
//!
//! Rows serialize as plain JSON objects. Deserialization walks the map with
//! a visitor so fields keep the order the backend sent them in, independent
//! of how `serde_json` orders its own `Map`.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Row;
use super::Value;

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a table row")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Row, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut row = Row::new();
        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            row.insert(key, Value::from(value));
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keeps_field_order() {
        let json = r#"{"zeta": 1, "alpha": "a", "mid": null}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = row.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.get("mid"), Some(&Value::Null));
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let row = Row::new().set("zeta", 1i64).set("alpha", "a");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":"a"}"#);
    }

    #[test]
    fn test_nested_values_survive() {
        let json = r#"{"tags": ["vpn", "network"], "assignee": {"id": 3}}"#;
        let row: Row = serde_json::from_str(json).unwrap();
        assert_eq!(
            row.get("tags"),
            Some(&Value::Json(serde_json::json!(["vpn", "network"])))
        );
        let back = serde_json::to_string(&row).unwrap();
        assert_eq!(back, r#"{"tags":["vpn","network"],"assignee":{"id":3}}"#);
    }
}
