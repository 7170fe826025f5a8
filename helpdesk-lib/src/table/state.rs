//! Table controller state.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use log::trace;
use log::warn;

use crate::bridge::Backend;
use crate::error::TableError;
use crate::model::Row;

use super::column::Column;
use super::config::Density;
use super::config::TableConfig;
use super::export;
use super::export::ExportFile;
use super::export::ExportFormat;
use super::filter;
use super::page;
use super::selection::Selection;
use super::sort;
use super::sort::Direction;
use super::sort::SortState;
use super::view::Cell;
use super::view::HeaderCell;
use super::view::PageView;
use super::view::RenderedRow;
use super::view::TableView;

/// Where the table's rows currently stand.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState {
    Loading,
    Failed(String),
    Invalid(String),
    Ready(Arc<[Row]>),
}

/// A searchable, sortable, paginated table over a shared row collection.
///
/// Every view is derived from scratch: search, then column filters, then
/// sort, then pagination. The row collection itself is never mutated.
///
/// # Example
///
/// ```
/// use helpdesk_lib::model::Row;
/// use helpdesk_lib::table::{Column, Table, TableConfig};
///
/// let mut table = Table::new(
///     vec![Column::new("name", "Name")],
///     TableConfig::default().with_page_size(2),
/// );
/// table.set_rows(vec![
///     Row::new().set("name", "Alpha"),
///     Row::new().set("name", "Beta"),
///     Row::new().set("name", "gamma"),
/// ]);
///
/// table.set_search_term("Be");
/// assert_eq!(table.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct Table {
    columns: Vec<Column>,
    config: TableConfig,
    data: DataState,
    search_term: String,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
    selection: Selection,
    hidden_columns: BTreeSet<String>,
    column_filters: BTreeMap<String, String>,
    processing: BTreeSet<String>,
    dirty: bool,
}

impl Table {
    /// Create a table in the loading state.
    ///
    /// A selection column is prepended when row selection is enabled.
    pub fn new(columns: Vec<Column>, config: TableConfig) -> Self {
        let mut all = Vec::with_capacity(columns.len() + 1);
        if config.enable_row_selection {
            all.push(Column::selection());
        }
        all.extend(columns.into_iter().filter(|c| !c.is_selection()));

        Self {
            columns: all,
            page_size: config.effective_page_size(),
            config,
            data: DataState::Loading,
            search_term: String::new(),
            sort: None,
            page: 0,
            selection: Selection::new(),
            hidden_columns: BTreeSet::new(),
            column_filters: BTreeMap::new(),
            processing: BTreeSet::new(),
            dirty: true,
        }
    }

    /// Create a table with initial rows.
    pub fn with_rows(columns: Vec<Column>, config: TableConfig, rows: Vec<Row>) -> Self {
        let mut table = Self::new(columns, config);
        table.set_rows(rows);
        table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// All columns, including the selection column and hidden ones.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    pub fn data(&self) -> &DataState {
        &self.data
    }

    /// All rows, if the data is ready.
    pub fn rows(&self) -> Option<&[Row]> {
        match &self.data {
            DataState::Ready(rows) => Some(&**rows),
            _ => None,
        }
    }

    /// Replace the row collection.
    ///
    /// Selections of rows that disappeared are dropped and the current page
    /// is clamped into the new page range.
    pub fn set_rows(&mut self, rows: impl Into<Arc<[Row]>>) {
        let rows: Arc<[Row]> = rows.into();
        debug!("Table {:?}: {} rows", self.title(), rows.len());
        let ids: Vec<String> = rows
            .iter()
            .filter_map(|row| row.id(&self.config.id_field))
            .collect();
        self.selection.retain(&ids);
        self.processing.retain(|id| ids.contains(id));
        self.data = DataState::Ready(rows);
        self.page = page::clamp_page(self.page, self.total_pages());
        self.mark_dirty();
    }

    /// Accept raw JSON from the data-fetch collaborator.
    ///
    /// Anything other than an array of objects puts the table into the
    /// [`DataState::Invalid`] state instead of failing.
    pub fn set_data(&mut self, data: serde_json::Value) {
        let serde_json::Value::Array(items) = data else {
            warn!("Table {:?}: data is not an array", self.title());
            self.set_invalid("Invalid data: expected a list of rows");
            return;
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                warn!("Table {:?}: row {} is not an object", self.title(), index);
                self.set_invalid(format!("Invalid data: row {index} is not a record"));
                return;
            }
            match serde_json::from_value::<Row>(item) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    self.set_invalid(format!("Invalid data: row {index}: {e}"));
                    return;
                }
            }
        }
        self.set_rows(rows);
    }

    pub fn set_loading(&mut self) {
        self.data = DataState::Loading;
        self.mark_dirty();
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.data = DataState::Failed(message.into());
        self.mark_dirty();
    }

    fn set_invalid(&mut self, message: impl Into<String>) {
        self.data = DataState::Invalid(message.into());
        self.page = 0;
        self.mark_dirty();
    }

    /// Fetch rows for `resource` from the backend.
    ///
    /// Fetch errors are kept as [`DataState::Failed`]; they never propagate.
    pub async fn load(&mut self, backend: &dyn Backend, resource: &str) {
        self.set_loading();
        match backend.fetch(resource).await {
            Ok(data) => self.set_data(data),
            Err(e) => {
                warn!("Table {:?}: fetch of '{}' failed: {}", self.title(), resource, e);
                self.set_failed(e.to_string());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Rows after search, column filters and sort; not paginated.
    pub fn processed_rows(&self) -> Vec<&Row> {
        let Some(rows) = self.rows() else {
            return Vec::new();
        };
        let searched = filter::search(rows.iter(), &self.search_term);
        let filtered = if self.config.enable_column_filters {
            filter::by_columns(searched, &self.columns, &self.column_filters)
        } else {
            searched
        };
        let (field, direction) = match &self.sort {
            Some(s) => (Some(s.field.as_str()), s.direction),
            None => (None, Direction::Asc),
        };
        let sorted = sort::sort_rows(filtered, field, direction, self.config.sort_mode);
        trace!(
            "Table {:?}: {} of {} rows after filtering",
            self.title(),
            sorted.len(),
            rows.len()
        );
        sorted
    }

    /// Number of rows after filtering.
    pub fn filtered_count(&self) -> usize {
        self.processed_rows().len()
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.filtered_count(), self.page_size)
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&Row> {
        let rows = self.processed_rows();
        page::paginate(&rows, self.page, self.page_size).to_vec()
    }

    fn visible_row_ids(&self) -> Vec<String> {
        self.visible_rows()
            .into_iter()
            .filter_map(|row| row.id(&self.config.id_field))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Set the search text. Always returns to the first page.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 0;
        debug!("Table {:?}: search '{}'", self.title(), self.search_term);
        self.mark_dirty();
    }

    /// Current per-column filter values.
    pub fn column_filters(&self) -> &BTreeMap<String, String> {
        &self.column_filters
    }

    /// Set a per-column filter value. Returns to the first page.
    ///
    /// Ignored unless column filters are enabled and the column is
    /// filterable. An empty value clears the filter.
    pub fn set_column_filter(&mut self, column_id: &str, value: impl Into<String>) -> bool {
        if !self.config.enable_column_filters {
            warn!("Table {:?}: column filters are disabled", self.title());
            return false;
        }
        if !self.column(column_id).is_some_and(|c| c.filterable) {
            warn!("Table {:?}: column '{}' is not filterable", self.title(), column_id);
            return false;
        }
        let value = value.into();
        if value.is_empty() {
            self.column_filters.remove(column_id);
        } else {
            self.column_filters.insert(column_id.to_string(), value);
        }
        self.page = 0;
        self.mark_dirty();
        true
    }

    /// Clear every column filter. Returns to the first page.
    pub fn clear_column_filters(&mut self) {
        self.column_filters.clear();
        self.page = 0;
        self.mark_dirty();
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Sort by a column, toggling the direction if it is already sorted.
    ///
    /// A different column starts ascending. Unknown or non-sortable columns
    /// are ignored. The page is kept: sorting does not change the row count.
    pub fn set_sort(&mut self, column_id: &str) -> Option<&SortState> {
        if !self.column(column_id).is_some_and(|c| c.sortable) {
            warn!("Table {:?}: column '{}' is not sortable", self.title(), column_id);
            return None;
        }
        let next = match &self.sort {
            Some(current) if current.field == column_id => {
                SortState::new(column_id, current.direction.toggled())
            }
            _ => SortState::new(column_id, Direction::Asc),
        };
        debug!("Table {:?}: sort {:?}", self.title(), next);
        self.sort = Some(next);
        self.mark_dirty();
        self.sort.as_ref()
    }

    /// Return to insertion order.
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current zero-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go to a page, clamped into the valid range.
    ///
    /// Returns `false` (and changes nothing) if the clamped page is the
    /// current one.
    pub fn set_page(&mut self, page: usize) -> bool {
        let target = page::clamp_page(page, self.total_pages());
        if target == self.page {
            return false;
        }
        self.page = target;
        self.mark_dirty();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Set rows per page (minimum 1). Returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
        self.mark_dirty();
    }

    /// Rescale the configured page size, e.g. when the sidebar toggles.
    /// Returns to the first page.
    pub fn set_page_size_scale(&mut self, scale: f64) {
        self.config.page_size_scale = scale;
        self.set_page_size(self.config.effective_page_size());
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.selected()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected rows, in collection order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        let Some(rows) = self.rows() else {
            return Vec::new();
        };
        rows.iter()
            .filter(|row| {
                row.id(&self.config.id_field)
                    .is_some_and(|id| self.selection.is_selected(&id))
            })
            .collect()
    }

    /// Toggle one row. Returns `true` if it is now selected.
    pub fn toggle_row_selection(&mut self, id: &str) -> bool {
        if !self.config.enable_row_selection {
            return false;
        }
        let selected = self.selection.toggle(id);
        self.mark_dirty();
        selected
    }

    /// Select every row on the current page, or deselect them all if they
    /// already are. Rows on other pages are untouched.
    ///
    /// Returns `true` if the page ends up fully selected.
    pub fn toggle_all_visible_selection(&mut self) -> bool {
        if !self.config.enable_row_selection {
            return false;
        }
        let ids = self.visible_row_ids();
        if ids.is_empty() {
            return false;
        }
        self.mark_dirty();
        if self.selection.all_selected(&ids) {
            self.selection.deselect_all(&ids);
            false
        } else {
            self.selection.select_all(&ids);
            true
        }
    }

    /// Clear all selection. Returns the ids that were deselected.
    pub fn clear_selection(&mut self) -> Vec<String> {
        let removed = self.selection.clear();
        if !removed.is_empty() {
            self.mark_dirty();
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Column visibility
    // -------------------------------------------------------------------------

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column(column_id).is_some() && !self.hidden_columns.contains(column_id)
    }

    /// Show or hide a column. Returns `true` if visibility changed.
    ///
    /// Hiding a column flagged as not hideable is rejected.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        if !self.config.enable_column_visibility {
            return false;
        }
        let Some(column) = self.column(column_id) else {
            return false;
        };
        if !visible && !column.hideable {
            warn!("Table {:?}: column '{}' cannot be hidden", self.title(), column_id);
            return false;
        }
        let changed = if visible {
            self.hidden_columns.remove(column_id)
        } else {
            self.hidden_columns.insert(column_id.to_string())
        };
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Visible columns in declaration order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !self.hidden_columns.contains(&c.id))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Row actions
    // -------------------------------------------------------------------------

    /// Mark a row action (assign, status update, delete) as outstanding.
    ///
    /// Fails while another action on the same row is still in flight, which
    /// keeps at most one request per row.
    pub fn begin_row_action(&mut self, id: &str) -> Result<(), TableError> {
        let exists = self
            .rows()
            .is_some_and(|rows| rows.iter().any(|r| r.id(&self.config.id_field).as_deref() == Some(id)));
        if !exists {
            return Err(TableError::RowNotFound(id.to_string()));
        }
        if !self.processing.insert(id.to_string()) {
            return Err(TableError::ActionInProgress(id.to_string()));
        }
        self.mark_dirty();
        Ok(())
    }

    /// Release a row after its action completed. Returns `false` if none was
    /// outstanding.
    pub fn finish_row_action(&mut self, id: &str) -> bool {
        let released = self.processing.remove(id);
        if released {
            self.mark_dirty();
        }
        released
    }

    pub fn is_processing(&self, id: &str) -> bool {
        self.processing.contains(id)
    }

    // -------------------------------------------------------------------------
    // Density
    // -------------------------------------------------------------------------

    pub fn density(&self) -> Density {
        self.config.density
    }

    pub fn set_density(&mut self, density: Density) {
        if self.config.density != density {
            self.config.density = density;
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Export the filtered and sorted rows (all pages).
    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, TableError> {
        if !self.config.enable_export {
            return Err(TableError::ExportDisabled);
        }
        match &self.data {
            DataState::Ready(_) => {}
            DataState::Loading => return Err(TableError::NoData("still loading".into())),
            DataState::Failed(msg) | DataState::Invalid(msg) => {
                return Err(TableError::NoData(msg.clone()));
            }
        }

        let rows = self.processed_rows();
        let contents = match format {
            ExportFormat::Csv => export::to_csv(&self.visible_columns(), &rows)?,
            ExportFormat::Json => export::to_json(&rows)?,
        };
        debug!("Table {:?}: exported {} rows as {:?}", self.title(), rows.len(), format);
        Ok(ExportFile {
            file_name: export::file_name(self.title(), format),
            mime_type: format.mime_type(),
            contents,
        })
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    fn title(&self) -> Option<&str> {
        self.config.title.as_deref()
    }

    /// Build the render-ready view of the current state.
    pub fn view(&self) -> TableView {
        match &self.data {
            DataState::Loading => return TableView::Loading,
            DataState::Failed(msg) => return TableView::Failed(msg.clone()),
            DataState::Invalid(msg) => return TableView::Invalid(msg.clone()),
            DataState::Ready(_) => {}
        }

        let rows = self.processed_rows();
        if rows.is_empty() {
            let searching = !self.search_term.trim().is_empty() || !self.column_filters.is_empty();
            let message = if searching {
                "No results match your search."
            } else {
                "No data available."
            };
            return TableView::Empty(message.to_string());
        }

        let total_pages = page::total_pages(rows.len(), self.page_size);
        let current = page::clamp_page(self.page, total_pages);
        let page_rows = page::paginate(&rows, current, self.page_size);
        let columns = self.visible_columns();

        let header = columns
            .iter()
            .map(|column| HeaderCell {
                id: column.id.clone(),
                label: column.header.clone(),
                sortable: column.sortable,
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.field == column.id)
                    .map(|s| s.direction),
                class_name: column.class_name.clone(),
                filter: (self.config.enable_column_filters && column.filterable).then(|| {
                    self.column_filters
                        .get(&column.id)
                        .cloned()
                        .unwrap_or_default()
                }),
                is_selection: column.is_selection(),
            })
            .collect();

        let rendered: Vec<RenderedRow> = page_rows
            .iter()
            .map(|row| {
                let id = row.id(&self.config.id_field);
                let selected = id.as_deref().is_some_and(|id| self.selection.is_selected(id));
                let processing = id.as_deref().is_some_and(|id| self.processing.contains(id));
                let cells = columns
                    .iter()
                    .map(|column| {
                        if column.is_selection() {
                            Cell::Checkbox(selected)
                        } else {
                            Cell::Text(column.render_cell(row))
                        }
                    })
                    .collect();
                RenderedRow {
                    id,
                    selected,
                    processing,
                    cells,
                }
            })
            .collect();

        let all_visible_selected = self.config.enable_row_selection && {
            let ids: Vec<String> = page_rows
                .iter()
                .filter_map(|row| row.id(&self.config.id_field))
                .collect();
            self.selection.all_selected(&ids)
        };

        TableView::Page(PageView {
            header,
            rows: rendered,
            page: current,
            total_pages,
            total_rows: rows.len(),
            page_size: self.page_size,
            show_pagination: total_pages > 1,
            all_visible_selected,
            density: self.config.density,
        })
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the table has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered(count: i64) -> Vec<Row> {
        (1..=count)
            .map(|i| Row::new().set("id", i).set("name", format!("Row {i}")))
            .collect()
    }

    fn table(config: TableConfig, rows: Vec<Row>) -> Table {
        Table::with_rows(
            vec![
                Column::new("id", "ID"),
                Column::new("name", "Name").filterable(),
                Column::new("actions", "Actions").disable_sort().cannot_hide(),
            ],
            config,
            rows,
        )
    }

    #[test]
    fn test_new_table_is_loading() {
        let table = Table::new(vec![Column::new("id", "ID")], TableConfig::default());
        assert_eq!(table.view(), TableView::Loading);
    }

    #[test]
    fn test_pagination_boundary() {
        let mut table = table(TableConfig::default().with_page_size(5), numbered(7));
        assert_eq!(table.total_pages(), 2);
        assert_eq!(table.visible_rows().len(), 5);
        assert!(table.set_page(5));
        assert_eq!(table.page(), 1);
        assert_eq!(table.visible_rows().len(), 2);
    }

    #[test]
    fn test_set_page_to_current_is_noop() {
        let mut table = table(TableConfig::default().with_page_size(5), numbered(7));
        table.set_page(1);
        table.clear_dirty();
        assert!(!table.set_page(1));
        assert!(!table.is_dirty());
    }

    #[test]
    fn test_search_filter_and_page_size_reset_page() {
        let mut table = table(
            TableConfig::default().with_page_size(2).with_column_filters(),
            numbered(9),
        );

        table.set_page(3);
        table.set_search_term("row");
        assert_eq!(table.page(), 0);

        table.set_page(3);
        assert!(table.set_column_filter("name", "row"));
        assert_eq!(table.page(), 0);

        table.set_page(3);
        table.set_page_size(3);
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn test_sort_keeps_page_and_toggles() {
        let mut table = table(TableConfig::default().with_page_size(2), numbered(5));
        table.set_page(1);

        let state = table.set_sort("name").cloned();
        assert_eq!(state, Some(SortState::new("name", Direction::Asc)));
        let state = table.set_sort("name").cloned();
        assert_eq!(state, Some(SortState::new("name", Direction::Desc)));
        let state = table.set_sort("id").cloned();
        assert_eq!(state, Some(SortState::new("id", Direction::Asc)));
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_sort_rejects_disabled_column() {
        let mut table = table(TableConfig::default(), numbered(3));
        assert!(table.set_sort("actions").is_none());
        assert!(table.set_sort("nope").is_none());
        assert!(table.sort().is_none());
    }

    #[test]
    fn test_non_array_data_is_invalid_state() {
        let mut table = table(TableConfig::default(), Vec::new());
        table.set_data(serde_json::json!({"data": []}));
        assert!(matches!(table.view(), TableView::Invalid(_)));
        assert!(table.processed_rows().is_empty());

        table.set_data(serde_json::json!([{"id": 1}, 5]));
        assert!(matches!(table.view(), TableView::Invalid(_)));

        table.set_data(serde_json::json!([{"id": 1, "name": "ok"}]));
        assert!(table.view().as_page().is_some());
    }

    #[test]
    fn test_empty_result_hides_pagination() {
        let mut table = table(TableConfig::default().with_page_size(5), numbered(3));
        let view = table.view();
        assert!(!view.as_page().unwrap().show_pagination);

        table.set_search_term("zzz");
        assert_eq!(
            table.view(),
            TableView::Empty("No results match your search.".to_string())
        );
    }

    #[test]
    fn test_select_all_is_page_scoped() {
        let mut table = table(
            TableConfig::default().with_page_size(2).with_row_selection(),
            numbered(5),
        );
        assert!(table.toggle_all_visible_selection());
        assert_eq!(table.selected_ids(), vec!["1", "2"]);

        table.set_page(1);
        assert!(table.toggle_all_visible_selection());
        assert_eq!(table.selected_ids(), vec!["1", "2", "3", "4"]);

        assert!(!table.toggle_all_visible_selection());
        assert_eq!(table.selected_ids(), vec!["1", "2"]);

        assert_eq!(table.clear_selection(), vec!["1", "2"]);
    }

    #[test]
    fn test_selection_disabled_is_noop() {
        let mut table = table(TableConfig::default(), numbered(3));
        assert!(!table.toggle_row_selection("1"));
        assert!(!table.toggle_all_visible_selection());
        assert!(table.selected_ids().is_empty());
    }

    #[test]
    fn test_selection_column_renders_checkbox() {
        let mut table = table(TableConfig::default().with_row_selection(), numbered(2));
        table.toggle_row_selection("2");
        let view = table.view();
        let page = view.as_page().unwrap();
        assert!(page.header[0].is_selection);
        assert_eq!(page.rows[0].cells[0], Cell::Checkbox(false));
        assert_eq!(page.rows[1].cells[0], Cell::Checkbox(true));
        assert_eq!(page.rows[1].cells[2], Cell::Text("Row 2".to_string()));
    }

    #[test]
    fn test_column_visibility() {
        let mut table = table(TableConfig::default().with_column_visibility(), numbered(1));
        assert!(table.set_column_visibility("name", false));
        assert!(!table.is_column_visible("name"));
        assert!(!table.set_column_visibility("actions", false));
        assert!(table.is_column_visible("actions"));

        let ids: Vec<&str> = table.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "actions"]);
        assert!(table.set_column_visibility("name", true));
    }

    #[test]
    fn test_row_action_guard() {
        let mut table = table(TableConfig::default(), numbered(2));
        assert!(table.begin_row_action("1").is_ok());
        assert!(matches!(
            table.begin_row_action("1"),
            Err(TableError::ActionInProgress(id)) if id == "1"
        ));
        assert!(matches!(
            table.begin_row_action("7"),
            Err(TableError::RowNotFound(id)) if id == "7"
        ));
        assert!(table.is_processing("1"));
        assert!(table.finish_row_action("1"));
        assert!(!table.finish_row_action("1"));
    }

    #[test]
    fn test_set_rows_clamps_page_and_drops_stale_selection() {
        let mut table = table(
            TableConfig::default().with_page_size(2).with_row_selection(),
            numbered(6),
        );
        table.set_page(2);
        table.toggle_row_selection("6");
        table.toggle_row_selection("1");

        table.set_rows(numbered(3));
        assert_eq!(table.page(), 1);
        assert_eq!(table.selected_ids(), vec!["1"]);
    }

    #[test]
    fn test_page_size_scale() {
        let mut table = table(TableConfig::default().with_page_size(4), numbered(10));
        table.set_page(1);
        table.set_page_size_scale(2.0);
        assert_eq!(table.page_size(), 8);
        assert_eq!(table.page(), 0);
    }
}
