//! Audit-trail viewer utilities.
//!
//! Filtering, sorting and paging of audit entries already held in memory.
//! Recording entries is the backend's job.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::model::AuditAction;
use crate::model::Row;
use crate::model::Value;
use crate::table::Column;
use crate::table::Direction;
use crate::table::page;

/// Display format of audit timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_name: String,
    pub action: AuditAction,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Entity reference such as `Ticket #12`.
    pub fn entity_label(&self) -> String {
        match self.entity_id {
            Some(id) => format!("{} #{}", self.entity_type, id),
            None => self.entity_type.clone(),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        [
            self.user_name.as_str(),
            self.description.as_str(),
            self.entity_type.as_str(),
            self.action.label(),
            self.ip_address.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

impl From<&AuditEntry> for Row {
    fn from(entry: &AuditEntry) -> Self {
        Row::new()
            .set("id", entry.id)
            .set("user_name", entry.user_name.as_str())
            .set("action", entry.action.as_str())
            .set("entity_type", entry.entity_type.as_str())
            .set("entity_id", entry.entity_id)
            .set("description", entry.description.as_str())
            .set("ip_address", entry.ip_address.clone())
            .set(
                "created_at",
                entry.created_at.format(TIMESTAMP_FORMAT).to_string(),
            )
    }
}

/// Columns of the audit log table. The action column shows the label.
pub fn audit_columns() -> Vec<Column> {
    vec![
        Column::new("created_at", "Date & Time"),
        Column::new("user_name", "User").filterable(),
        Column::new("action", "Action").filterable().render(|row| {
            row.get_str("action")
                .map(|a| AuditAction::parse(a).label().to_string())
                .unwrap_or_default()
        }),
        Column::new("entity_type", "Entity").render(|row| {
            let entity = row.get_str("entity_type").unwrap_or_default();
            match row.get("entity_id").and_then(Value::display_string) {
                Some(id) => format!("{entity} #{id}"),
                None => entity.to_string(),
            }
        }),
        Column::new("description", "Description").disable_sort(),
        Column::new("ip_address", "IP Address").disable_sort(),
    ]
}

/// Field an audit list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSortField {
    #[default]
    CreatedAt,
    UserName,
    Action,
    EntityType,
}

impl AuditSortField {
    fn compare(self, a: &AuditEntry, b: &AuditEntry) -> Ordering {
        match self {
            AuditSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            AuditSortField::UserName => a.user_name.to_lowercase().cmp(&b.user_name.to_lowercase()),
            AuditSortField::Action => a.action.label().cmp(b.action.label()),
            AuditSortField::EntityType => a
                .entity_type
                .to_lowercase()
                .cmp(&b.entity_type.to_lowercase()),
        }
    }
}

/// Filter, order and page selection over audit entries.
///
/// Defaults to newest first, 15 entries per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditQuery {
    pub search: String,
    pub action: Option<AuditAction>,
    /// Exact user name, case-insensitive.
    pub user: Option<String>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub to: Option<DateTime<Utc>>,
    pub sort: AuditSortField,
    pub direction: Direction,
    /// Zero-based page.
    pub page: usize,
    pub per_page: usize,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            action: None,
            user: None,
            from: None,
            to: None,
            sort: AuditSortField::CreatedAt,
            direction: Direction::Desc,
            page: 0,
            per_page: 15,
        }
    }
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_range(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_sort(mut self, sort: AuditSortField, direction: Direction) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || entry.matches_search(&needle))
            && self.action.is_none_or(|action| entry.action == action)
            && self
                .user
                .as_deref()
                .is_none_or(|user| entry.user_name.eq_ignore_ascii_case(user.trim()))
            && self.from.is_none_or(|from| entry.created_at >= from)
            && self.to.is_none_or(|to| entry.created_at <= to)
    }

    /// Run the query. The page is clamped into range.
    pub fn apply(&self, entries: &[AuditEntry]) -> AuditPage {
        let mut matched: Vec<&AuditEntry> = entries.iter().filter(|e| self.matches(e)).collect();
        matched.sort_by(|a, b| self.direction.apply(self.sort.compare(a, b)));

        let total = matched.len();
        let total_pages = page::total_pages(total, self.per_page);
        let current = page::clamp_page(self.page, total_pages);
        let entries = page::paginate(&matched, current, self.per_page)
            .iter()
            .map(|e| (*e).clone())
            .collect();

        AuditPage {
            entries,
            total,
            page: current,
            total_pages,
        }
    }
}

/// One page of a query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    /// Matching entries across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl AuditPage {
    pub fn rows(&self) -> Vec<Row> {
        self.entries.iter().map(Row::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn entry(id: i64, user: &str, action: AuditAction, hour: u32) -> AuditEntry {
        AuditEntry {
            id,
            user_name: user.to_string(),
            action,
            entity_type: "Ticket".to_string(),
            entity_id: Some(id * 10),
            description: format!("{} ticket", action.label()),
            ip_address: Some("10.0.0.1".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    fn entries() -> Vec<AuditEntry> {
        vec![
            entry(1, "alice", AuditAction::Created, 8),
            entry(2, "bob", AuditAction::Assigned, 9),
            entry(3, "alice", AuditAction::StatusChanged, 10),
            entry(4, "carol", AuditAction::Deleted, 11),
        ]
    }

    fn ids(page: &AuditPage) -> Vec<i64> {
        page.entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let page = AuditQuery::new().apply(&entries());
        assert_eq!(ids(&page), vec![4, 3, 2, 1]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_filters_combine() {
        let page = AuditQuery::new().with_user("ALICE").apply(&entries());
        assert_eq!(ids(&page), vec![3, 1]);

        let page = AuditQuery::new()
            .with_user("alice")
            .with_action(AuditAction::Created)
            .apply(&entries());
        assert_eq!(ids(&page), vec![1]);

        let page = AuditQuery::new().with_search("status").apply(&entries());
        assert_eq!(ids(&page), vec![3]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let page = AuditQuery::new()
            .with_range(Some(from), Some(to))
            .with_sort(AuditSortField::CreatedAt, Direction::Asc)
            .apply(&entries());
        assert_eq!(ids(&page), vec![2, 3]);
    }

    #[test]
    fn test_paging_clamps() {
        let page = AuditQuery::new().with_per_page(3).with_page(9).apply(&entries());
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 4);
        assert_eq!(ids(&page), vec![1]);
    }

    #[test]
    fn test_entry_to_row() {
        let row = Row::from(&entry(2, "bob", AuditAction::Assigned, 9));
        assert_eq!(row.get_str("action"), Some("assigned"));
        assert_eq!(row.get_str("created_at"), Some("2024-03-01 09:00:00"));

        let action = audit_columns().remove(2);
        assert_eq!(action.render_cell(&row), "Assigned");
        let entity = audit_columns().remove(3);
        assert_eq!(entity.render_cell(&row), "Ticket #20");
    }

    #[test]
    fn test_deserialize_backend_entry() {
        let entry: AuditEntry = serde_json::from_value(serde_json::json!({
            "id": 5,
            "user_name": "dave",
            "action": "login",
            "entity_type": "User",
            "created_at": "2024-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(entry.action, AuditAction::Login);
        assert_eq!(entry.entity_label(), "User");
    }
}
