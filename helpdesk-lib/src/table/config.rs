//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use super::sort::SortMode;

/// Row spacing preset. Purely a rendering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Comfortable,
}

/// Configuration for a [`Table`](super::Table).
///
/// Every optional capability is off by default and turned on explicitly.
///
/// # Example
///
/// ```
/// use helpdesk_lib::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_title("Tickets")
///     .with_page_size(25)
///     .with_row_selection()
///     .with_export();
/// assert_eq!(config.effective_page_size(), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Title; also the base name of exported files.
    pub title: Option<String>,

    /// Field holding each row's identifier.
    ///
    /// Default: `"id"`
    pub id_field: String,

    /// Rows per page before scaling.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Multiplier applied to `page_size`, e.g. to show more rows while the
    /// navigation sidebar is collapsed.
    ///
    /// Default: 1.0
    pub page_size_scale: f64,

    pub density: Density,

    /// How sort keys are compared.
    ///
    /// Default: [`SortMode::Lexicographic`]
    pub sort_mode: SortMode,

    pub enable_row_selection: bool,
    pub enable_column_filters: bool,
    pub enable_export: bool,
    pub enable_column_visibility: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title: None,
            id_field: "id".to_string(),
            page_size: 10,
            page_size_scale: 1.0,
            density: Density::Normal,
            sort_mode: SortMode::Lexicographic,
            enable_row_selection: false,
            enable_column_filters: false,
            enable_export: false,
            enable_column_visibility: false,
        }
    }
}

impl TableConfig {
    /// Creates a new table config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_size_scale(mut self, scale: f64) -> Self {
        self.page_size_scale = scale;
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    pub fn with_row_selection(mut self) -> Self {
        self.enable_row_selection = true;
        self
    }

    pub fn with_column_filters(mut self) -> Self {
        self.enable_column_filters = true;
        self
    }

    pub fn with_export(mut self) -> Self {
        self.enable_export = true;
        self
    }

    pub fn with_column_visibility(mut self) -> Self {
        self.enable_column_visibility = true;
        self
    }

    /// Page size after scaling; never below 1.
    pub fn effective_page_size(&self) -> usize {
        let scale = if self.page_size_scale.is_finite() && self.page_size_scale > 0.0 {
            self.page_size_scale
        } else {
            1.0
        };
        ((self.page_size as f64 * scale).round() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_page_size_scales_and_floors() {
        assert_eq!(TableConfig::default().effective_page_size(), 10);
        assert_eq!(
            TableConfig::default()
                .with_page_size_scale(1.5)
                .effective_page_size(),
            15
        );
        assert_eq!(TableConfig::default().with_page_size(0).effective_page_size(), 1);
        assert_eq!(
            TableConfig::default()
                .with_page_size_scale(f64::NAN)
                .effective_page_size(),
            10
        );
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: TableConfig =
            serde_json::from_str(r#"{"page_size": 20, "enable_export": true}"#).unwrap();
        assert_eq!(config.page_size, 20);
        assert!(config.enable_export);
        assert_eq!(config.id_field, "id");
    }
}
