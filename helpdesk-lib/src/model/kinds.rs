//! Closed enumerations for ticket and user attributes.
//!
//! The backend sends these as strings. Each enum parses leniently (case and
//! separator insensitive) and falls back to an explicit catch-all variant, so
//! label and icon lookups are exhaustive matches instead of substring checks.

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

/// Normalizes a backend string for matching: lower case, `-`/space -> `_`.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! string_enum_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = std::convert::Infallible;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(raw))
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

// =============================================================================
// Role
// =============================================================================

/// Account role; selects which dashboard a user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Role {
    Admin,
    Hr,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Hr, Role::User];

    /// Parses a backend role name. Unknown names are treated as `User`.
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "admin" | "administrator" => Role::Admin,
            "hr" | "human_resources" => Role::Hr,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hr => "hr",
            Role::User => "user",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Hr => "HR",
            Role::User => "User",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Role::Admin => "shield",
            Role::Hr => "users",
            Role::User => "user",
        }
    }

    /// Route of the dashboard this role lands on.
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Hr => "/hr/dashboard",
            Role::User => "/dashboard",
        }
    }
}

string_enum_serde!(Role);

// =============================================================================
// TicketStatus
// =============================================================================

/// Lifecycle status of a ticket. Transitions are enforced by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TicketStatus {
    PendingApproval,
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Rejected,
    Unknown,
}

impl TicketStatus {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "pending" | "pending_approval" => TicketStatus::PendingApproval,
            "open" | "new" => TicketStatus::Open,
            "in_progress" | "inprogress" => TicketStatus::InProgress,
            "on_hold" | "onhold" => TicketStatus::OnHold,
            "resolved" => TicketStatus::Resolved,
            "closed" => TicketStatus::Closed,
            "rejected" => TicketStatus::Rejected,
            _ => TicketStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::PendingApproval => "pending_approval",
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Rejected => "rejected",
            TicketStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::PendingApproval => "Pending Approval",
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::OnHold => "On Hold",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
            TicketStatus::Rejected => "Rejected",
            TicketStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TicketStatus::PendingApproval => "hourglass",
            TicketStatus::Open => "circle-dot",
            TicketStatus::InProgress => "loader",
            TicketStatus::OnHold => "pause-circle",
            TicketStatus::Resolved => "check-circle",
            TicketStatus::Closed => "archive",
            TicketStatus::Rejected => "x-circle",
            TicketStatus::Unknown => "help-circle",
        }
    }

    /// Whether the ticket no longer accepts work.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TicketStatus::Resolved | TicketStatus::Closed | TicketStatus::Rejected
        )
    }
}

string_enum_serde!(TicketStatus);

// =============================================================================
// TicketPriority
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Critical,
    ];

    /// Parses a backend priority. Unknown values are treated as `Medium`.
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "low" => TicketPriority::Low,
            "high" => TicketPriority::High,
            "critical" | "urgent" => TicketPriority::Critical,
            _ => TicketPriority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Critical => "Critical",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TicketPriority::Low => "arrow-down",
            TicketPriority::Medium => "minus",
            TicketPriority::High => "arrow-up",
            TicketPriority::Critical => "alert-triangle",
        }
    }
}

string_enum_serde!(TicketPriority);

// =============================================================================
// TicketCategory
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TicketCategory {
    Hardware,
    Software,
    Network,
    Email,
    Printer,
    Access,
    Other,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 7] = [
        TicketCategory::Hardware,
        TicketCategory::Software,
        TicketCategory::Network,
        TicketCategory::Email,
        TicketCategory::Printer,
        TicketCategory::Access,
        TicketCategory::Other,
    ];

    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "hardware" => TicketCategory::Hardware,
            "software" | "application" => TicketCategory::Software,
            "network" | "internet" | "vpn" => TicketCategory::Network,
            "email" | "mail" => TicketCategory::Email,
            "printer" | "printing" => TicketCategory::Printer,
            "access" | "account" | "account_access" => TicketCategory::Access,
            _ => TicketCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Hardware => "hardware",
            TicketCategory::Software => "software",
            TicketCategory::Network => "network",
            TicketCategory::Email => "email",
            TicketCategory::Printer => "printer",
            TicketCategory::Access => "access",
            TicketCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketCategory::Hardware => "Hardware",
            TicketCategory::Software => "Software",
            TicketCategory::Network => "Network",
            TicketCategory::Email => "Email",
            TicketCategory::Printer => "Printer",
            TicketCategory::Access => "Account & Access",
            TicketCategory::Other => "Other",
        }
    }

    /// Icon name shown next to the category.
    pub fn icon(&self) -> &'static str {
        match self {
            TicketCategory::Hardware => "monitor",
            TicketCategory::Software => "app-window",
            TicketCategory::Network => "wifi",
            TicketCategory::Email => "mail",
            TicketCategory::Printer => "printer",
            TicketCategory::Access => "key-round",
            TicketCategory::Other => "help-circle",
        }
    }
}

string_enum_serde!(TicketCategory);

// =============================================================================
// AuditAction
// =============================================================================

/// Kind of change recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Assigned,
    StatusChanged,
    Approved,
    Rejected,
    Commented,
    Login,
    Logout,
    Other,
}

impl AuditAction {
    pub const ALL: [AuditAction; 11] = [
        AuditAction::Created,
        AuditAction::Updated,
        AuditAction::Deleted,
        AuditAction::Assigned,
        AuditAction::StatusChanged,
        AuditAction::Approved,
        AuditAction::Rejected,
        AuditAction::Commented,
        AuditAction::Login,
        AuditAction::Logout,
        AuditAction::Other,
    ];

    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "create" | "created" => AuditAction::Created,
            "update" | "updated" | "edit" | "edited" => AuditAction::Updated,
            "delete" | "deleted" => AuditAction::Deleted,
            "assign" | "assigned" => AuditAction::Assigned,
            "status_change" | "status_changed" | "status_update" | "status_updated" => {
                AuditAction::StatusChanged
            }
            "approve" | "approved" => AuditAction::Approved,
            "reject" | "rejected" => AuditAction::Rejected,
            "comment" | "commented" => AuditAction::Commented,
            "login" | "logged_in" => AuditAction::Login,
            "logout" | "logged_out" => AuditAction::Logout,
            _ => AuditAction::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Deleted => "deleted",
            AuditAction::Assigned => "assigned",
            AuditAction::StatusChanged => "status_changed",
            AuditAction::Approved => "approved",
            AuditAction::Rejected => "rejected",
            AuditAction::Commented => "commented",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::Created => "Created",
            AuditAction::Updated => "Updated",
            AuditAction::Deleted => "Deleted",
            AuditAction::Assigned => "Assigned",
            AuditAction::StatusChanged => "Status Changed",
            AuditAction::Approved => "Approved",
            AuditAction::Rejected => "Rejected",
            AuditAction::Commented => "Commented",
            AuditAction::Login => "Logged In",
            AuditAction::Logout => "Logged Out",
            AuditAction::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AuditAction::Created => "plus-circle",
            AuditAction::Updated => "pencil",
            AuditAction::Deleted => "trash-2",
            AuditAction::Assigned => "user-check",
            AuditAction::StatusChanged => "refresh-cw",
            AuditAction::Approved => "check-circle",
            AuditAction::Rejected => "x-circle",
            AuditAction::Commented => "message-square",
            AuditAction::Login => "log-in",
            AuditAction::Logout => "log-out",
            AuditAction::Other => "activity",
        }
    }
}

string_enum_serde!(AuditAction);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(TicketStatus::parse("In Progress"), TicketStatus::InProgress);
        assert_eq!(TicketStatus::parse("on-hold"), TicketStatus::OnHold);
        assert_eq!(TicketStatus::parse("weird"), TicketStatus::Unknown);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("guest"), Role::User);
    }

    #[test]
    fn test_serde_uses_backend_names() {
        let category: TicketCategory = serde_json::from_str("\"Printer\"").unwrap();
        assert_eq!(category, TicketCategory::Printer);
        assert_eq!(category.icon(), "printer");
        assert_eq!(
            serde_json::to_string(&TicketStatus::PendingApproval).unwrap(),
            "\"pending_approval\""
        );
    }

    #[test]
    fn test_audit_action_parse() {
        assert_eq!(AuditAction::parse("Status Update"), AuditAction::StatusChanged);
        assert_eq!(AuditAction::parse("LOGIN"), AuditAction::Login);
        assert_eq!(AuditAction::parse("exported"), AuditAction::Other);
        let action: AuditAction = "assign".parse().unwrap();
        assert_eq!(action.icon(), "user-check");
    }

    #[test]
    fn test_every_category_has_distinct_icon() {
        let mut icons: Vec<&str> = TicketCategory::ALL.iter().map(|c| c.icon()).collect();
        icons.sort_unstable();
        icons.dedup();
        assert_eq!(icons.len(), TicketCategory::ALL.len());
    }
}
