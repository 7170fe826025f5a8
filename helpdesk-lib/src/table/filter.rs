//! Row filtering: global search and per-column filters.
//!
//! Search inspects raw row data, not rendered cell text. A cell whose
//! renderer shows a derived label that is absent from the row's fields will
//! not be found by search.

use std::collections::BTreeMap;

use crate::model::Row;
use crate::model::Value;

use super::column::Column;

/// Returns `true` if the value's lower-cased display string contains `needle`.
///
/// `needle` must already be lower-cased. Null values never match.
fn value_contains(value: &Value, needle: &str) -> bool {
    value
        .display_string()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}

/// Keeps rows where at least one field value contains `term`, ignoring case.
///
/// An empty or whitespace-only term keeps every row, in order.
pub fn search<'a, I>(rows: I, term: &str) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    if term.trim().is_empty() {
        return rows.into_iter().collect();
    }
    let needle = term.to_lowercase();
    rows.into_iter()
        .filter(|row| row.values().any(|value| value_contains(value, &needle)))
        .collect()
}

/// Applies per-column filter values; every non-blank filter must match.
///
/// Each filter matches against the column's resolved value (accessor first,
/// then field lookup). Filters naming unknown columns are ignored.
pub fn by_columns<'a>(
    rows: Vec<&'a Row>,
    columns: &[Column],
    filters: &BTreeMap<String, String>,
) -> Vec<&'a Row> {
    let active: Vec<(&Column, String)> = filters
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .filter_map(|(id, value)| {
            columns
                .iter()
                .find(|column| &column.id == id)
                .map(|column| (column, value.to_lowercase()))
        })
        .collect();

    if active.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| {
            active
                .iter()
                .all(|(column, needle)| value_contains(&column.value(row), needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter()
            .map(|row| row.get_str("name").unwrap_or_default().to_string())
            .collect()
    }

    fn sample() -> Vec<Row> {
        vec![
            Row::new().set("name", "Alpha"),
            Row::new().set("name", "Beta"),
            Row::new().set("name", "gamma"),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = sample();
        assert_eq!(names(&search(&rows, "a")), vec!["Alpha", "Beta", "gamma"]);
        assert_eq!(names(&search(&rows, "Be")), vec!["Beta"]);
        assert_eq!(names(&search(&rows, "GAM")), vec!["gamma"]);
    }

    #[test]
    fn test_blank_term_keeps_everything() {
        let rows = sample();
        assert_eq!(search(&rows, "").len(), 3);
        assert_eq!(search(&rows, "   ").len(), 3);
    }

    #[test]
    fn test_search_matches_any_field_and_skips_nulls() {
        let rows = vec![
            Row::new().set("name", "Printer").set("floor", 3i64),
            Row::new().set("name", "Laptop").set("floor", Value::Null),
        ];
        assert_eq!(names(&search(&rows, "3")), vec!["Printer"]);
        assert!(search(&rows, "null").is_empty());
    }

    #[test]
    fn test_by_columns_requires_all_filters() {
        let rows = vec![
            Row::new().set("name", "Alpha").set("status", "open"),
            Row::new().set("name", "Alpine").set("status", "closed"),
            Row::new().set("name", "Beta").set("status", "open"),
        ];
        let columns = vec![Column::new("name", "Name"), Column::new("status", "Status")];
        let mut filters = BTreeMap::new();
        filters.insert("name".to_string(), "alp".to_string());
        filters.insert("status".to_string(), "OPEN".to_string());
        filters.insert("missing".to_string(), "x".to_string());

        let all: Vec<&Row> = rows.iter().collect();
        assert_eq!(names(&by_columns(all, &columns, &filters)), vec!["Alpha"]);
    }
}
