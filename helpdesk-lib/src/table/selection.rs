//! Row selection set.

use std::collections::BTreeSet;

/// Tracks selected rows by their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle selection for an id. Returns `true` if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Check if an id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Whether every id in `ids` is selected. `false` for an empty list.
    pub fn all_selected(&self, ids: &[String]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Select every id in `ids`. Returns the ids that were newly selected.
    pub fn select_all(&mut self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.selected.insert((*id).clone()))
            .cloned()
            .collect()
    }

    /// Deselect every id in `ids`. Returns the ids that were removed.
    pub fn deselect_all(&mut self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.selected.remove(id.as_str()))
            .cloned()
            .collect()
    }

    /// Keep only ids present in `ids`.
    pub fn retain(&mut self, ids: &[String]) {
        self.selected.retain(|id| ids.contains(id));
    }

    /// Clear all selections. Returns the ids that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    /// All selected ids, sorted.
    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle("1"));
        assert!(selection.is_selected("1"));
        assert!(!selection.toggle("1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_reports_new_ids_only() {
        let mut selection = Selection::new();
        selection.toggle("2");
        let added = selection.select_all(&ids(&["1", "2", "3"]));
        assert_eq!(added, ids(&["1", "3"]));
        assert!(selection.all_selected(&ids(&["1", "2", "3"])));
        assert_eq!(selection.deselect_all(&ids(&["2", "9"])), ids(&["2"]));
        assert_eq!(selection.clear(), ids(&["1", "3"]));
    }
}
