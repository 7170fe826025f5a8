//! Export of table rows to CSV and JSON files.
//!
//! CSV carries only visible data columns, in declaration order. JSON dumps
//! whole rows with their own field order, whatever the column visibility.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use csv::QuoteStyle;
use csv::Terminator;
use csv::WriterBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

use super::column::Column;

/// File name used when the table has no title.
pub const DEFAULT_EXPORT_NAME: &str = "table-export";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// A generated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    /// Writes the file into `dir` and returns its path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        log::info!("Exported {} bytes to {}", self.contents.len(), path.display());
        Ok(path)
    }
}

/// Renders CSV: a quoted header record, then one quoted record per row.
///
/// Every field is quoted and inner quotes are doubled. Selection columns are
/// skipped. Null and missing values become empty fields. Records are joined
/// with `\n` with no trailing newline; zero rows yield the header only.
pub fn to_csv(columns: &[&Column], rows: &[&Row]) -> Result<String, csv::Error> {
    let columns: Vec<&Column> = columns
        .iter()
        .copied()
        .filter(|column| !column.is_selection())
        .collect();

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| column.value(row).display_string().unwrap_or_default()),
        )?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    let mut out = String::from_utf8_lossy(&bytes).into_owned();
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Renders rows as pretty-printed JSON (two-space indent).
pub fn to_json(rows: &[&Row]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

/// File name for an export: the title, or [`DEFAULT_EXPORT_NAME`].
pub fn file_name(title: Option<&str>, format: ExportFormat) -> String {
    let base = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_EXPORT_NAME);
    format!("{}.{}", base, format.extension())
}
