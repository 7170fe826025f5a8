//! Printable documents for a single record (ticket, user).
//!
//! A [`RecordDocument`] renders to plain text, to a standalone HTML page that
//! opens the print dialog, or to fixed-height pages for saving.

use chrono::DateTime;
use chrono::Local;
use log::debug;

use crate::model::Row;
use crate::model::Value;

/// Display format of the "Generated on" footer.
pub const GENERATED_FORMAT: &str = "%B %-d, %Y at %H:%M";

const RULE_WIDTH: usize = 60;

/// One labelled group of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field; empty values print as `-`.
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            "-".to_string()
        } else {
            value
        };
        self.fields.push((label.into(), value));
        self
    }

    /// Add a field read from a row; missing and null fields print as `-`.
    pub fn row_field(self, label: impl Into<String>, row: &Row, field: &str) -> Self {
        let value = row
            .get(field)
            .and_then(Value::display_string)
            .unwrap_or_default();
        self.field(label, value)
    }
}

/// A record laid out for printing: header, sections, and a footer carrying
/// the generation time.
///
/// # Example
///
/// ```
/// use helpdesk_lib::model::Row;
/// use helpdesk_lib::print::{RecordDocument, Section};
///
/// let ticket = Row::new().set("id", 12).set("title", "VPN drops").set("status", "open");
/// let doc = RecordDocument::new("Ticket #12")
///     .subtitle("IT Helpdesk")
///     .section(
///         Section::new("Ticket Information")
///             .row_field("Title", &ticket, "title")
///             .row_field("Status", &ticket, "status"),
///     );
///
/// assert!(doc.render_text().contains("Title: VPN drops"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
    pub generated_at: DateTime<Local>,
}

impl RecordDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            sections: Vec::new(),
            generated_at: Local::now(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Fix the generation time (tests, reprints).
    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }

    /// Base name for a saved copy, e.g. `ticket-12`.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                stem.push(c.to_ascii_lowercase());
            } else if !stem.is_empty() && !stem.ends_with('-') {
                stem.push('-');
            }
        }
        let stem = stem.trim_end_matches('-');
        if stem.is_empty() {
            "record".to_string()
        } else {
            stem.to_string()
        }
    }

    fn footer(&self) -> String {
        format!("Generated on {}", self.generated_at.format(GENERATED_FORMAT))
    }

    fn body_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for section in &self.sections {
            lines.push(section.title.to_uppercase());
            lines.push("-".repeat(section.title.chars().count()));
            for (label, value) in &section.fields {
                let mut values = value.lines();
                lines.push(format!("{label}: {}", values.next().unwrap_or_default()));
                // continuation lines of multi-line values stay indented
                lines.extend(values.map(|line| format!("    {line}")));
            }
            lines.push(String::new());
        }
        lines
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        if let Some(subtitle) = &self.subtitle {
            lines.push(subtitle.clone());
        }
        lines.push("=".repeat(RULE_WIDTH));
        lines.push(String::new());
        lines
    }

    /// The whole document as plain text.
    pub fn render_text(&self) -> String {
        let mut lines = self.header_lines();
        lines.extend(self.body_lines());
        lines.push("=".repeat(RULE_WIDTH));
        lines.push(self.footer());
        lines.join("\n")
    }

    /// A standalone HTML page that opens the print dialog when loaded.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        html.push_str(
            "<style>\n\
             body { font-family: Arial, sans-serif; margin: 40px; color: #222; }\n\
             h1 { margin-bottom: 4px; }\n\
             .subtitle { color: #666; margin-top: 0; }\n\
             h2 { border-bottom: 1px solid #ccc; padding-bottom: 4px; font-size: 16px; }\n\
             dl { display: grid; grid-template-columns: 180px 1fr; gap: 6px 12px; }\n\
             dt { font-weight: bold; }\n\
             dd { margin: 0; white-space: pre-wrap; }\n\
             footer { margin-top: 40px; font-size: 12px; color: #666; }\n\
             @media print { body { margin: 0; } }\n\
             </style>\n",
        );
        html.push_str("</head>\n<body onload=\"window.print()\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        if let Some(subtitle) = &self.subtitle {
            html.push_str(&format!(
                "<p class=\"subtitle\">{}</p>\n",
                escape_html(subtitle)
            ));
        }
        for section in &self.sections {
            html.push_str(&format!("<h2>{}</h2>\n<dl>\n", escape_html(&section.title)));
            for (label, value) in &section.fields {
                html.push_str(&format!(
                    "<dt>{}</dt><dd>{}</dd>\n",
                    escape_html(label),
                    escape_html(value)
                ));
            }
            html.push_str("</dl>\n");
        }
        html.push_str(&format!("<footer>{}</footer>\n", escape_html(&self.footer())));
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Split the document into pages of at most `lines_per_page` lines.
    ///
    /// The header repeats on every page and each page ends with the
    /// generation footer and `Page i of n`. Tiny page heights still fit one
    /// body line per page.
    pub fn paginate(&self, lines_per_page: usize) -> Vec<String> {
        let header = self.header_lines();
        let footer = ["=".repeat(RULE_WIDTH), self.footer(), String::new()];
        // +1 for the "Page i of n" line
        let chrome = header.len() + footer.len() + 1;
        let per_page = lines_per_page.saturating_sub(chrome).max(1);

        let mut body = self.body_lines();
        while body.last().is_some_and(String::is_empty) {
            body.pop();
        }
        let chunks: Vec<&[String]> = if body.is_empty() {
            vec![&body[..]]
        } else {
            body.chunks(per_page).collect()
        };
        let total = chunks.len();
        debug!("Document {:?}: {} pages", self.title, total);

        chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                let mut lines = header.clone();
                lines.extend(chunk.iter().cloned());
                lines.extend(footer.iter().cloned());
                lines.push(format!("Page {} of {}", index + 1, total));
                lines.join("\n")
            })
            .collect()
    }
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
