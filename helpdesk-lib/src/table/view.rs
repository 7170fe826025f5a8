//! Render-ready snapshot of a table.

use super::config::Density;
use super::sort::Direction;

/// Header cell of a visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    /// Direction if the table is currently sorted by this column.
    pub sort: Option<Direction>,
    pub class_name: Option<String>,
    /// Current filter text, when the column offers a filter input.
    pub filter: Option<String>,
    pub is_selection: bool,
}

/// Content of one body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Checkbox(bool),
}

impl Cell {
    /// Plain text form, used by text renderers.
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Text(text) => text,
            Cell::Checkbox(true) => "[x]",
            Cell::Checkbox(false) => "[ ]",
        }
    }
}

/// One rendered body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: Option<String>,
    pub selected: bool,
    /// A row action (assign, status update, delete) is outstanding.
    pub processing: bool,
    pub cells: Vec<Cell>,
}

/// The current page of a table with rows to show.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
    /// Zero-based page index.
    pub page: usize,
    pub total_pages: usize,
    /// Row count after filtering, before pagination.
    pub total_rows: usize,
    pub page_size: usize,
    /// Pagination controls are only shown with more than one page.
    pub show_pagination: bool,
    pub all_visible_selected: bool,
    pub density: Density,
}

/// What the table should display.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// Waiting for the data-fetch collaborator.
    Loading,
    /// The fetch failed.
    Failed(String),
    /// The supplied data was not a list of rows.
    Invalid(String),
    /// Data is valid but nothing matches.
    Empty(String),
    Page(PageView),
}

impl TableView {
    pub fn as_page(&self) -> Option<&PageView> {
        match self {
            TableView::Page(page) => Some(page),
            _ => None,
        }
    }
}
