//! Subcommand implementations.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;
use helpdesk_lib::audit::{AuditEntry, AuditQuery, AuditSortField, audit_columns};
use helpdesk_lib::bridge::{Backend, HttpBackend};
use helpdesk_lib::model::{Row, Value};
use helpdesk_lib::print::{RecordDocument, Section};
use helpdesk_lib::table::{Column, Direction, ExportFormat, SortMode, Table, TableConfig, TableView};
use log::debug;
use log::info;

use crate::cli::{SourceArgs, ViewArgs, parse_action};
use crate::config::Config;
use crate::error::CliError;
use crate::render;

// -----------------------------------------------------------------------------
// Sources
// -----------------------------------------------------------------------------

/// Reads the records named by `source`.
async fn fetch(source: &SourceArgs, config: &Config) -> Result<serde_json::Value, CliError> {
    if let Some(path) = &source.file {
        debug!("Reading {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        return serde_json::from_str(&text).map_err(|e| CliError::json(path, e));
    }

    let Some(resource) = &source.resource else {
        return Err(CliError::Usage(
            "either --file or --resource is required".to_string(),
        ));
    };
    let backend = backend(source, config)?;
    let data = backend.fetch(resource).await?;
    Ok(unwrap_envelope(data))
}

fn backend(source: &SourceArgs, config: &Config) -> Result<HttpBackend, CliError> {
    let url = source
        .url
        .as_deref()
        .or(config.base_url.as_deref())
        .ok_or_else(|| CliError::Usage("no backend URL: pass --url or set base_url".to_string()))?;

    let mut builder = HttpBackend::builder(url);
    if let Some(token) = source.token.as_deref().or(config.token.as_deref()) {
        builder = builder.token(token);
    }
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Paginated list responses wrap their rows as `{"data": [...]}`.
fn unwrap_envelope(data: serde_json::Value) -> serde_json::Value {
    match data {
        serde_json::Value::Object(mut object) if object.get("data").is_some_and(|d| d.is_array()) => {
            object.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

// -----------------------------------------------------------------------------
// Tables
// -----------------------------------------------------------------------------

/// `assigned_to` -> `Assigned To`
fn humanize(field: &str) -> String {
    field
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            if word.eq_ignore_ascii_case("id") {
                return "ID".to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Columns from `--columns`, or every field of the first record.
fn columns_for(data: &serde_json::Value, requested: &[String]) -> Vec<Column> {
    let fields: Vec<String> = if requested.is_empty() {
        data.as_array()
            .and_then(|rows| rows.first())
            .and_then(|row| row.as_object())
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        requested.to_vec()
    };

    fields
        .into_iter()
        .map(|field| {
            let header = humanize(&field);
            Column::new(field, header).filterable()
        })
        .collect()
}

fn build_table(
    data: serde_json::Value,
    view: &ViewArgs,
    config: TableConfig,
) -> Result<Table, CliError> {
    let columns = columns_for(&data, &view.columns);
    let mut config = config.with_column_filters().with_column_visibility();
    if view.typed_sort {
        config = config.with_sort_mode(SortMode::Typed);
    }
    if let Some(size) = view.page_size {
        config = config.with_page_size(size);
    }

    let mut table = Table::new(columns, config);
    table.set_data(data);

    if let Some(term) = &view.search {
        table.set_search_term(term.as_str());
    }
    for filter in &view.filters {
        let Some((column, text)) = filter.split_once('=') else {
            return Err(CliError::Usage(format!("filter '{filter}' is not COLUMN=TEXT")));
        };
        if !table.set_column_filter(column.trim(), text.trim()) {
            return Err(CliError::Usage(format!("cannot filter on column '{column}'")));
        }
    }
    if let Some(column) = &view.sort {
        if table.set_sort(column).is_none() {
            return Err(CliError::Usage(format!("cannot sort on column '{column}'")));
        }
        if view.desc {
            table.set_sort(column);
        }
    }
    for column in &view.hide {
        table.set_column_visibility(column, false);
    }
    table.set_page(view.page.saturating_sub(1));
    Ok(table)
}

pub async fn table(source: &SourceArgs, view: &ViewArgs, config: &Config) -> Result<(), CliError> {
    let data = fetch(source, config).await?;
    let table = build_table(data, view, config.table.clone())?;
    println!("{}", render::table_view(&table.view(), table.columns()));
    Ok(())
}

pub async fn export(
    source: &SourceArgs,
    view: &ViewArgs,
    format: ExportFormat,
    out: &Path,
    title: Option<&str>,
    config: &Config,
) -> Result<(), CliError> {
    let data = fetch(source, config).await?;
    let mut table_config = config.table.clone().with_export();
    if let Some(title) = title.or(source.resource.as_deref()) {
        table_config = table_config.with_title(title);
    }
    let table = build_table(data, view, table_config)?;

    let file = table.export(format)?;
    let path = file.write_to(out).map_err(|e| CliError::io(out, e))?;
    println!("Exported {} rows to {}", table.filtered_count(), path.display());
    Ok(())
}

// -----------------------------------------------------------------------------
// Audit
// -----------------------------------------------------------------------------

fn parse_day(raw: &str, end_of_day: bool) -> Result<chrono::DateTime<Utc>, CliError> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| CliError::Usage(format!("invalid date '{raw}': {e}")))?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .unwrap_or_default();
    Ok(day.and_time(time).and_utc())
}

pub struct AuditArgs<'a> {
    pub search: Option<&'a str>,
    pub action: Option<&'a str>,
    pub user: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub page: usize,
    pub per_page: usize,
    pub oldest_first: bool,
}

pub async fn audit(source: &SourceArgs, args: AuditArgs<'_>, config: &Config) -> Result<(), CliError> {
    let data = fetch(source, config).await?;
    let entries: Vec<AuditEntry> = serde_json::from_value(data)
        .map_err(|e| CliError::Data(format!("not an audit log: {e}")))?;

    let mut query = AuditQuery::new()
        .with_page(args.page.saturating_sub(1))
        .with_per_page(args.per_page);
    if let Some(search) = args.search {
        query = query.with_search(search);
    }
    if let Some(raw) = args.action {
        let action = parse_action(raw)
            .ok_or_else(|| CliError::Usage(format!("unknown action '{raw}'")))?;
        query = query.with_action(action);
    }
    if let Some(user) = args.user {
        query = query.with_user(user);
    }
    let from = args.from.map(|d| parse_day(d, false)).transpose()?;
    let to = args.to.map(|d| parse_day(d, true)).transpose()?;
    query = query.with_range(from, to);
    if args.oldest_first {
        query = query.with_sort(AuditSortField::CreatedAt, Direction::Asc);
    }

    let page = query.apply(&entries);
    info!("Audit query matched {} of {} entries", page.total, entries.len());

    let columns = audit_columns();
    let table = Table::with_rows(
        columns,
        TableConfig::default()
            .with_title("Audit Log")
            .with_page_size(page.entries.len().max(1)),
        page.rows(),
    );
    match table.view() {
        TableView::Page(mut view) => {
            // the query did the paging; show its numbers
            view.page = page.page;
            view.total_pages = page.total_pages;
            view.total_rows = page.total;
            view.show_pagination = page.total_pages > 1;
            println!(
                "{}",
                render::table_view(&TableView::Page(view), table.columns())
            );
        }
        _ => println!("No audit entries found."),
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Print
// -----------------------------------------------------------------------------

fn pick_record(data: serde_json::Value, id: Option<&str>) -> Result<Row, CliError> {
    let record = match (data, id) {
        (serde_json::Value::Array(items), Some(id)) => items
            .into_iter()
            .find(|item| {
                item.get("id")
                    .map(|v| Value::from(v.clone()))
                    .and_then(|v| v.display_string())
                    .as_deref()
                    == Some(id)
            })
            .ok_or_else(|| CliError::Data(format!("no record with id {id}")))?,
        (serde_json::Value::Array(mut items), None) if items.len() == 1 => items.remove(0),
        (serde_json::Value::Array(_), None) => {
            return Err(CliError::Usage("the source holds a list; pass --id".to_string()));
        }
        (object, _) => object,
    };
    if !record.is_object() {
        return Err(CliError::Data("the record is not an object".to_string()));
    }
    serde_json::from_value(record).map_err(|e| CliError::Data(e.to_string()))
}

pub async fn print(
    source: &SourceArgs,
    id: Option<&str>,
    title: Option<&str>,
    html: Option<&Path>,
    lines_per_page: Option<usize>,
    config: &Config,
) -> Result<(), CliError> {
    let data = fetch(source, config).await?;
    let record = pick_record(data, id)?;

    let title = match (title, record.id("id")) {
        (Some(title), _) => title.to_string(),
        (None, Some(id)) => format!("Record #{id}"),
        (None, None) => "Record".to_string(),
    };
    let section = record
        .fields()
        .fold(Section::new("Details"), |section, (field, _)| {
            section.row_field(humanize(field), &record, field)
        });
    let document = RecordDocument::new(title).section(section);

    if let Some(path) = html {
        fs::write(path, document.render_html()).map_err(|e| CliError::io(path, e))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }
    match lines_per_page {
        Some(lines) => println!("{}", document.paginate(lines).join("\n\x0c\n")),
        None => println!("{}", document.render_text()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("assigned_to"), "Assigned To");
        assert_eq!(humanize("branch_id"), "Branch ID");
        assert_eq!(humanize("title"), "Title");
        assert_eq!(humanize("identity"), "Identity");
    }

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!({"data": [1], "total": 1})), json!([1]));
        assert_eq!(unwrap_envelope(json!({"open": 3})), json!({"open": 3}));
    }

    #[test]
    fn test_pick_record() {
        let data = json!([{"id": 1, "title": "a"}, {"id": 2, "title": "b"}]);
        let row = pick_record(data.clone(), Some("2")).unwrap();
        assert_eq!(row.get_str("title"), Some("b"));
        assert!(matches!(pick_record(data, None), Err(CliError::Usage(_))));
        assert!(pick_record(json!({"id": 3}), None).is_ok());
    }

    #[test]
    fn test_parse_day_bounds() {
        let from = parse_day("2024-03-01", false).unwrap();
        let to = parse_day("2024-03-01", true).unwrap();
        assert_eq!(from.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-03-01T23:59:59+00:00");
        assert!(parse_day("03/01/2024", false).is_err());
    }
}
