//! Column definitions.

use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Renders a cell to display text.
pub type CellRenderer = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Derives a cell value from a row (used by export and column filters).
pub type CellAccessor = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// What a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Shows row data.
    #[default]
    Data,
    /// The row-selection checkbox column. Never exported, never hidden.
    Selection,
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column configuration.
///
/// Columns are supplied once when the table is built and never change
/// afterwards; only their visibility can be toggled at runtime.
///
/// # Examples
///
/// ```
/// use helpdesk_lib::table::Column;
///
/// let columns = vec![
///     Column::new("id", "#").disable_sort(),
///     Column::new("title", "Title").filterable(),
///     Column::new("status", "Status")
///         .render(|row| row.get_str("status").unwrap_or("-").to_uppercase()),
///     Column::new("actions", "Actions").disable_sort().cannot_hide(),
/// ];
/// ```
#[derive(Clone)]
pub struct Column {
    /// Unique identifier; also the field read when no accessor is set.
    pub id: String,
    /// Header label.
    pub header: String,
    pub kind: ColumnKind,
    /// Visual hint passed through to the renderer (CSS class or style name).
    pub class_name: Option<String>,
    /// Width hint in characters.
    pub width: Option<u16>,
    pub align: Alignment,
    /// Whether a per-column filter input is offered.
    pub filterable: bool,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the column may be hidden through the visibility menu.
    pub hideable: bool,
    renderer: Option<CellRenderer>,
    accessor: Option<CellAccessor>,
}

impl Column {
    /// Create a data column reading field `id`.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind: ColumnKind::Data,
            class_name: None,
            width: None,
            align: Alignment::Left,
            filterable: false,
            sortable: true,
            hideable: true,
            renderer: None,
            accessor: None,
        }
    }

    /// The checkbox column added when row selection is enabled.
    pub fn selection() -> Self {
        Self {
            kind: ColumnKind::Selection,
            sortable: false,
            hideable: false,
            width: Some(3),
            ..Self::new(SELECTION_COLUMN_ID, "")
        }
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Offer a per-column filter for this column.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Exclude this column from sorting.
    pub fn disable_sort(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Prevent this column from being hidden.
    pub fn cannot_hide(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Custom cell rendering.
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(f));
        self
    }

    /// Custom value accessor, used instead of the field lookup by id.
    pub fn accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(f));
        self
    }

    pub fn is_selection(&self) -> bool {
        self.kind == ColumnKind::Selection
    }

    /// The cell's value: the accessor if present, else the field named `id`.
    pub fn value(&self, row: &Row) -> Value {
        match &self.accessor {
            Some(accessor) => accessor(row),
            None => row.get(&self.id).cloned().unwrap_or_default(),
        }
    }

    /// The cell's display text. Missing values render as an empty string.
    pub fn render_cell(&self, row: &Row) -> String {
        match &self.renderer {
            Some(renderer) => renderer(row),
            None => self.value(row).display_string().unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("renderer", &self.renderer.is_some())
            .field("accessor", &self.accessor.is_some())
            .finish()
    }
}

/// Id of the synthetic selection column.
pub const SELECTION_COLUMN_ID: &str = "select";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_prefers_accessor() {
        let row = Row::new().set("first", "Ada").set("last", "Lovelace");
        let plain = Column::new("first", "First");
        let derived = Column::new("full", "Name").accessor(|row| {
            Value::from(format!(
                "{} {}",
                row.get_str("first").unwrap_or_default(),
                row.get_str("last").unwrap_or_default()
            ))
        });

        assert_eq!(plain.value(&row), Value::from("Ada"));
        assert_eq!(derived.value(&row), Value::from("Ada Lovelace"));
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let row = Row::new().set("name", "Alpha");
        assert_eq!(Column::new("email", "Email").render_cell(&row), "");
    }

    #[test]
    fn test_selection_column_flags() {
        let column = Column::selection();
        assert!(column.is_selection());
        assert!(!column.sortable);
        assert!(!column.hideable);
    }
}
