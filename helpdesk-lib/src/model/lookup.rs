//! Reference collections for form selects (branches, departments, roles, categories).

use serde::Deserialize;
use serde::Serialize;

/// An `{id, name}` reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: i64,
    pub name: String,
}

impl Lookup {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An ordered collection of lookups, as supplied by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lookups(Vec<Lookup>);

impl Lookups {
    pub fn new(items: Vec<Lookup>) -> Self {
        Self(items)
    }

    /// Finds a lookup by id.
    pub fn find(&self, id: i64) -> Option<&Lookup> {
        self.0.iter().find(|item| item.id == id)
    }

    /// Display name for an id, if present.
    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.find(id).map(|item| item.name.as_str())
    }

    /// All ids in order.
    pub fn ids(&self) -> Vec<i64> {
        self.0.iter().map(|item| item.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lookup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Lookup> for Lookups {
    fn from_iter<I: IntoIterator<Item = Lookup>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_and_find() {
        let lookups: Lookups =
            serde_json::from_str(r#"[{"id": 1, "name": "Head Office"}, {"id": 4, "name": "Depot"}]"#)
                .unwrap();
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups.name_of(4), Some("Depot"));
        assert_eq!(lookups.name_of(9), None);
        assert_eq!(lookups.ids(), vec![1, 4]);
    }
}
