//! Form configurations used by the helpdesk screens.

use crate::model::Lookups;
use crate::model::Row;
use crate::model::TicketPriority;
use crate::model::Value;

use super::validation::Validator;
use super::wizard::FormStep;
use super::wizard::MultiStepForm;

const MIN_PASSWORD_LENGTH: usize = 8;

fn is_priority(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| TicketPriority::ALL.iter().any(|p| p.as_str() == s))
}

/// Digits with optional `+`, spaces, dashes and parentheses. Empty passes.
fn is_phone(value: &Value) -> bool {
    let Some(text) = value.as_str() else {
        return value.is_null();
    };
    let digits = text.chars().filter(char::is_ascii_digit).count();
    text.is_empty()
        || (digits >= 6
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')')))
}

/// The three-step ticket creation wizard.
///
/// 1. Issue: title and category.
/// 2. Details: description and priority.
/// 3. Location & contact: branch, department and optional contact details.
pub fn ticket_wizard(categories: &Lookups, branches: &Lookups, departments: &Lookups) -> MultiStepForm {
    let initial = Row::new()
        .set("title", "")
        .set("category_id", Value::Null)
        .set("description", "")
        .set("priority", TicketPriority::Medium.as_str())
        .set("branch_id", Value::Null)
        .set("department_id", Value::Null)
        .set("contact_email", "")
        .set("contact_phone", "");

    MultiStepForm::new("Create Ticket", initial)
        .step(FormStep::new(
            "Issue",
            Validator::new()
                .field("title")
                .required("Title is required")
                .min_length(5, "Title must be at least 5 characters")
                .max_length(255, "Title must not exceed 255 characters")
                .field("category_id")
                .selected("Please select a category")
                .one_of(categories.ids(), "Please select a valid category"),
        ))
        .step(FormStep::new(
            "Details",
            Validator::new()
                .field("description")
                .required("Description is required")
                .min_length(10, "Please describe the issue in at least 10 characters")
                .field("priority")
                .rule(is_priority, "Please select a priority"),
        ))
        .step(FormStep::new(
            "Location & Contact",
            Validator::new()
                .field("branch_id")
                .selected("Please select a branch")
                .one_of(branches.ids(), "Please select a valid branch")
                .field("department_id")
                .selected("Please select a department")
                .one_of(departments.ids(), "Please select a valid department")
                .field("contact_email")
                .email("Please enter a valid email address")
                .field("contact_phone")
                .rule(is_phone, "Please enter a valid phone number"),
        ))
}

fn user_initial() -> Row {
    Row::new()
        .set("name", "")
        .set("email", "")
        .set("role_id", Value::Null)
        .set("branch_id", Value::Null)
        .set("password", "")
        .set("password_confirmation", "")
}

fn user_identity(roles: &Lookups, branches: &Lookups) -> Validator {
    Validator::new()
        .field("name")
        .required("Name is required")
        .max_length(255, "Name must not exceed 255 characters")
        .field("email")
        .required("Email is required")
        .email("Please enter a valid email address")
        .field("role_id")
        .selected("Please select a role")
        .one_of(roles.ids(), "Please select a valid role")
        .field("branch_id")
        .selected("Please select a branch")
        .one_of(branches.ids(), "Please select a valid branch")
        .build()
}

/// The single-step dialog creating a user account.
pub fn user_form(roles: &Lookups, branches: &Lookups) -> MultiStepForm {
    let passwords = Validator::new()
        .field("password")
        .required("Password is required")
        .min_length(
            MIN_PASSWORD_LENGTH,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        )
        .field("password_confirmation")
        .matches_field("password", "Passwords do not match")
        .build();

    MultiStepForm::new("Add User", user_initial()).step(FormStep::new(
        "Account",
        user_identity(roles, branches).merge(passwords),
    ))
}

/// The dialog editing an existing user. The password may be left blank to
/// keep the current one.
pub fn user_edit_form(roles: &Lookups, branches: &Lookups) -> MultiStepForm {
    let passwords = Validator::new()
        .field("password")
        .rule(
            |v| {
                let len = v.as_str().map_or(0, |s| s.chars().count());
                len == 0 || len >= MIN_PASSWORD_LENGTH
            },
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        )
        .field("password_confirmation")
        .matches_field("password", "Passwords do not match")
        .build();

    MultiStepForm::new("Edit User", user_initial()).step(FormStep::new(
        "Account",
        user_identity(roles, branches).merge(passwords),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lookup;

    fn lookups(names: &[&str]) -> Lookups {
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| Lookup::new(id, *name))
            .collect()
    }

    #[test]
    fn test_ticket_wizard_walkthrough() {
        let mut form = ticket_wizard(
            &lookups(&["Hardware", "Software"]),
            &lookups(&["Amsterdam"]),
            &lookups(&["IT", "Finance"]),
        );
        form.open();
        assert_eq!(form.total_steps(), 3);

        let result = form.next();
        assert_eq!(result.error_for("title"), Some("Title is required"));
        assert_eq!(result.error_for("category_id"), Some("Please select a category"));

        form.update_field("title", "Laptop");
        form.update_field("category_id", 9i64);
        assert_eq!(
            form.next().error_for("category_id"),
            Some("Please select a valid category")
        );
        form.update_field("category_id", "1");
        assert!(form.next().is_valid());

        form.update_field("description", "Will not power on after update");
        assert!(form.next().is_valid());
        assert_eq!(form.step_title(), Some("Location & Contact"));

        form.update_field("branch_id", 1i64);
        form.update_field("department_id", 2i64);
        form.update_field("contact_phone", "12ab");
        assert!(form.next().is_invalid());
        form.update_field("contact_phone", "+31 (20) 555-0100");

        let payload = form.begin_submit().unwrap();
        assert_eq!(payload["priority"], "medium");
        assert_eq!(payload["department_id"], 2);
    }

    #[test]
    fn test_user_form_password_rules() {
        let mut form = user_form(&lookups(&["admin", "hr", "user"]), &lookups(&["HQ"]));
        form.open();
        form.update_field("name", "Sam Doe");
        form.update_field("email", "sam@example.com");
        form.update_field("role_id", 3i64);
        form.update_field("branch_id", 1i64);
        form.update_field("password", "short");
        form.update_field("password_confirmation", "different");

        let result = form.next();
        assert_eq!(
            result.error_for("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            result.error_for("password_confirmation"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_user_edit_form_allows_blank_password() {
        let mut form = user_edit_form(&lookups(&["admin"]), &lookups(&["HQ"]));
        form.open_with(
            &Row::new()
                .set("name", "Sam Doe")
                .set("email", "sam@example.com")
                .set("role_id", 1i64)
                .set("branch_id", 1i64),
        );
        assert!(form.begin_submit().is_ok());
    }
}
