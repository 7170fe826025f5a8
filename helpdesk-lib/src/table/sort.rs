//! Row sorting by a single field.

use std::cmp::Ordering;

use icu_collator::Collator;
use icu_collator::CollatorBorrowed;
use icu_collator::options::CollatorOptions;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ascending order (A-Z).
    #[default]
    Asc,
    /// Descending order (Z-A).
    Desc,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub(crate) fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// How two non-null sort keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Collate lower-cased display strings, numbers included:
    /// `[10, 9, 2]` ascending is `[10, 2, 9]`.
    #[default]
    Lexicographic,
    /// Compare two numbers numerically; anything else falls back to
    /// [`SortMode::Lexicographic`].
    Typed,
}

/// Current sort: a column id and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub direction: Direction,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Root-locale collator; `None` only when its data is unavailable.
fn collator() -> Option<CollatorBorrowed<'static>> {
    Collator::try_new(Default::default(), CollatorOptions::default())
        .inspect_err(|e| warn!("Root collation unavailable, sorting by code point: {e}"))
        .ok()
}

/// Punctuation before digits before letters; accented letters sit next to
/// their base letter (`alice`, `élodie`, `frank`).
fn lexicographic(collator: Option<&CollatorBorrowed<'_>>, a: &Value, b: &Value) -> Ordering {
    let a = a.display_string().unwrap_or_default().to_lowercase();
    let b = b.display_string().unwrap_or_default().to_lowercase();
    match collator {
        Some(collator) => collator.compare(&a, &b),
        None => a.cmp(&b),
    }
}

/// Compares two sort keys.
///
/// Nulls (and missing fields) always go last, whatever the direction.
/// Equal keys compare equal so a stable sort keeps their input order.
fn compare_values(
    a: Option<&Value>,
    b: Option<&Value>,
    direction: Direction,
    mode: SortMode,
    collator: Option<&CollatorBorrowed<'_>>,
) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if a == b => Ordering::Equal,
        (Some(a), Some(b)) => {
            let natural = match (mode, a.as_f64(), b.as_f64()) {
                (SortMode::Typed, Some(x), Some(y)) => {
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
                _ => lexicographic(collator, a, b),
            };
            direction.apply(natural)
        }
    }
}

/// Returns the rows ordered by `field`, or unchanged when `field` is `None`.
///
/// The sort is stable.
pub fn sort_rows<'a>(
    mut rows: Vec<&'a Row>,
    field: Option<&str>,
    direction: Direction,
    mode: SortMode,
) -> Vec<&'a Row> {
    let Some(field) = field else {
        return rows;
    };
    let collator = collator();
    rows.sort_by(|a, b| {
        compare_values(a.get(field), b.get(field), direction, mode, collator.as_ref())
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(rows: &[&Row], field: &str) -> Vec<Value> {
        rows.iter()
            .map(|row| row.get(field).cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let rows = vec![
            Row::new().set("v", 5i64),
            Row::new().set("v", Value::Null),
            Row::new().set("v", 1i64),
        ];
        let refs: Vec<&Row> = rows.iter().collect();

        let asc = sort_rows(refs.clone(), Some("v"), Direction::Asc, SortMode::Lexicographic);
        assert_eq!(
            values(&asc, "v"),
            vec![Value::Int(1), Value::Int(5), Value::Null]
        );

        let desc = sort_rows(refs, Some("v"), Direction::Desc, SortMode::Lexicographic);
        assert_eq!(
            values(&desc, "v"),
            vec![Value::Int(5), Value::Int(1), Value::Null]
        );
    }

    #[test]
    fn test_numbers_compare_as_strings_by_default() {
        let rows = vec![
            Row::new().set("n", 10i64),
            Row::new().set("n", 9i64),
            Row::new().set("n", 2i64),
        ];
        let refs: Vec<&Row> = rows.iter().collect();

        let lexi = sort_rows(refs.clone(), Some("n"), Direction::Asc, SortMode::Lexicographic);
        assert_eq!(
            values(&lexi, "n"),
            vec![Value::Int(10), Value::Int(2), Value::Int(9)]
        );

        let typed = sort_rows(refs, Some("n"), Direction::Asc, SortMode::Typed);
        assert_eq!(
            values(&typed, "n"),
            vec![Value::Int(2), Value::Int(9), Value::Int(10)]
        );
    }

    #[test]
    fn test_sort_is_stable_and_case_insensitive() {
        let rows = vec![
            Row::new().set("k", "b").set("i", 0i64),
            Row::new().set("k", "A").set("i", 1i64),
            Row::new().set("k", "B").set("i", 2i64),
            Row::new().set("k", "a").set("i", 3i64),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let sorted = sort_rows(refs, Some("k"), Direction::Asc, SortMode::Lexicographic);
        assert_eq!(
            values(&sorted, "i"),
            vec![Value::Int(1), Value::Int(3), Value::Int(0), Value::Int(2)]
        );
    }

    #[test]
    fn test_accents_and_punctuation_follow_collation() {
        let rows = vec![
            Row::new().set("name", "Frank"),
            Row::new().set("name", "Élodie"),
            Row::new().set("name", "{vip}"),
            Row::new().set("name", "alice"),
            Row::new().set("name", "Eve"),
        ];
        let refs: Vec<&Row> = rows.iter().collect();

        let asc = sort_rows(refs.clone(), Some("name"), Direction::Asc, SortMode::Lexicographic);
        assert_eq!(
            values(&asc, "name"),
            ["{vip}", "alice", "Élodie", "Eve", "Frank"].map(Value::from).to_vec()
        );

        let desc = sort_rows(refs, Some("name"), Direction::Desc, SortMode::Lexicographic);
        assert_eq!(
            values(&desc, "name"),
            ["Frank", "Eve", "Élodie", "alice", "{vip}"].map(Value::from).to_vec()
        );
    }

    #[test]
    fn test_no_field_keeps_input_order() {
        let rows = vec![Row::new().set("k", "z"), Row::new().set("k", "a")];
        let refs: Vec<&Row> = rows.iter().collect();
        let sorted = sort_rows(refs, None, Direction::Desc, SortMode::Lexicographic);
        assert_eq!(values(&sorted, "k"), vec![Value::from("z"), Value::from("a")]);
    }
}
