//! Plain-text rendering of table views.

use helpdesk_lib::table::{Alignment, Column, Density, Direction, PageView, TableView};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const MAX_CELL_WIDTH: usize = 40;

/// Cuts `text` to `width` display columns, ending in `…` when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let gap = width.saturating_sub(text.width());
    match align {
        Alignment::Left => format!("{text}{}", " ".repeat(gap)),
        Alignment::Right => format!("{}{text}", " ".repeat(gap)),
        Alignment::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// Renders the view; `columns` supplies alignment and width hints.
pub fn table_view(view: &TableView, columns: &[Column]) -> String {
    match view {
        TableView::Loading => "Loading...".to_string(),
        TableView::Failed(message) => format!("Failed to load data: {message}"),
        TableView::Invalid(message) => message.clone(),
        TableView::Empty(message) => message.clone(),
        TableView::Page(page) => page_view(page, columns),
    }
}

fn page_view(page: &PageView, columns: &[Column]) -> String {
    let align_of = |id: &str| {
        columns
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.align)
            .unwrap_or_default()
    };
    let width_hint = |id: &str| {
        columns
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.width)
            .map(usize::from)
            .unwrap_or(MAX_CELL_WIDTH)
    };

    let labels: Vec<String> = page
        .header
        .iter()
        .map(|h| match h.sort {
            Some(Direction::Asc) => format!("{} ▲", h.label),
            Some(Direction::Desc) => format!("{} ▼", h.label),
            None => h.label.clone(),
        })
        .collect();

    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .zip(&page.header)
                .map(|(cell, h)| truncate(cell.as_text(), width_hint(&h.id)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(label.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .zip(&page.header)
            .map(|((v, w), h)| pad(v, *w, align_of(&h.id)))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::new();
    out.push(line(&labels));
    out.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in &cells {
        out.push(line(row));
        if page.density == Density::Comfortable {
            out.push(String::new());
        }
    }
    if page.density != Density::Compact {
        out.push(String::new());
    }
    let count = match page.total_rows {
        1 => "1 row".to_string(),
        n => format!("{n} rows"),
    };
    if page.show_pagination {
        out.push(format!(
            "Page {} of {} ({count})",
            page.page + 1,
            page.total_pages
        ));
    } else {
        out.push(count);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_lib::model::Row;
    use helpdesk_lib::table::{Table, TableConfig};

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }

    fn page(rows: usize, page_size: usize) -> (Table, TableView) {
        let rows = (1..=rows)
            .map(|i| Row::new().set("id", i as i64).set("title", format!("Ticket {i}")))
            .collect();
        let table = Table::with_rows(
            vec![Column::new("id", "ID"), Column::new("title", "Title")],
            TableConfig::default().with_page_size(page_size),
            rows,
        );
        let view = table.view();
        (table, view)
    }

    #[test]
    fn test_single_page_has_no_pagination_footer() {
        let (table, view) = page(1, 10);
        assert!(!view.as_page().unwrap().show_pagination);
        let text = table_view(&view, table.columns());
        assert!(!text.contains("Page "));
        assert!(text.ends_with("1 row"));
    }

    #[test]
    fn test_multi_page_shows_pagination_footer() {
        let (table, view) = page(3, 2);
        let text = table_view(&view, table.columns());
        assert!(text.ends_with("Page 1 of 2 (3 rows)"));
    }

    #[test]
    fn test_pad_alignment() {
        assert_eq!(pad("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(pad("ab", 4, Alignment::Right), "  ab");
        assert_eq!(pad("ab", 5, Alignment::Center), " ab  ");
    }
}
