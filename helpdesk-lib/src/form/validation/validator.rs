//! Validator builder for fluent validation API.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

use super::result::{FieldError, ValidationResult};
use crate::model::Row;
use crate::model::Value;

/// Type alias for validation rule closures. The second argument is the
/// whole value map, for rules that compare fields.
type RuleFn = Arc<dyn Fn(&Value, &Row) -> bool + Send + Sync>;

#[derive(Clone)]
struct Rule {
    check: RuleFn,
    message: String,
}

/// Internal representation of a field being validated.
#[derive(Clone)]
struct FieldEntry {
    name: String,
    rules: Vec<Rule>,
}

impl FieldEntry {
    /// First failing rule's message.
    fn first_error(&self, values: &Row) -> Option<&str> {
        let value = values.get(&self.name).unwrap_or(&Value::Null);
        self.rules
            .iter()
            .find(|rule| !(rule.check)(value, values))
            .map(|rule| rule.message.as_str())
    }
}

/// Validates a set of named fields against a value map.
///
/// Only the first failing rule of each field is reported.
///
/// # Example
///
/// ```
/// use helpdesk_lib::form::validation::Validator;
/// use helpdesk_lib::model::Row;
///
/// let validator = Validator::new()
///     .field("password")
///         .required("Password is required")
///         .min_length(8, "Password must be at least 8 characters")
///     .field("password_confirmation")
///         .matches_field("password", "Passwords do not match")
///     .build();
///
/// let values = Row::new()
///     .set("password", "hunter2hunter2")
///     .set("password_confirmation", "hunter2");
/// let result = validator.validate(&values);
/// assert_eq!(result.error_for("password_confirmation"), Some("Passwords do not match"));
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    fields: Vec<FieldEntry>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field to validate.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            validator: self,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append every field of `other`.
    ///
    /// Used to build the "all steps" validator of a multi-step form. A field
    /// listed in both still reports a single message.
    pub fn merge(mut self, other: Validator) -> Self {
        self.fields.extend(other.fields);
        self
    }

    /// Names of the validated fields, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run all validations against `values`.
    pub fn validate(&self, values: &Row) -> ValidationResult {
        let mut errors = Vec::new();
        let mut reported = BTreeSet::new();

        for field in &self.fields {
            if reported.contains(field.name.as_str()) {
                continue;
            }
            if let Some(message) = field.first_error(values) {
                reported.insert(field.name.as_str());
                errors.push(FieldError {
                    field_name: field.name.clone(),
                    message: message.to_string(),
                });
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

impl From<FieldBuilder> for Validator {
    fn from(builder: FieldBuilder) -> Self {
        builder.build()
    }
}

/// Text form used by the length and format rules. Null reads as empty.
fn text_of(value: &Value) -> String {
    value.display_string().unwrap_or_default()
}

/// Integer id held by a select, whether sent as a number or a string.
fn id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::String(s) => s.trim().parse().ok(),
        Value::Json(serde_json::Value::Number(n)) => n.as_i64(),
        _ => None,
    }
}

/// Builder for adding validation rules to a single field.
pub struct FieldBuilder {
    validator: Validator,
    name: String,
    rules: Vec<Rule>,
}

impl FieldBuilder {
    /// Add a custom rule on the field's value.
    pub fn rule<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rule_with_values(move |v, _| f(v), msg)
    }

    /// Add a custom rule that can also read the other fields.
    pub fn rule_with_values<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value, &Row) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            check: Arc::new(f),
            message: msg.into(),
        });
        self
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        self.build().field(name)
    }

    /// Finalize and run all validations.
    pub fn validate(self, values: &Row) -> ValidationResult {
        self.build().validate(values)
    }

    /// Finalize this field and return the validator.
    pub fn build(self) -> Validator {
        let mut validator = self.validator;
        validator.fields.push(FieldEntry {
            name: self.name,
            rules: self.rules,
        });
        validator
    }

    // -------------------------------------------------------------------------
    // Text rules
    // -------------------------------------------------------------------------

    /// Require a non-empty value. Whitespace-only text counts as empty.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Json(serde_json::Value::Array(items)) => !items.is_empty(),
                Value::Json(serde_json::Value::Null) => false,
                _ => true,
            },
            msg,
        )
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| text_of(v).chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| text_of(v).chars().count() <= max, msg)
    }

    /// Require the value to match a regex pattern. Empty values pass; use
    /// [`required`](Self::required) for non-empty.
    pub fn pattern(self, pattern: Regex, msg: impl Into<String>) -> Self {
        self.rule(
            move |v| {
                let text = text_of(v);
                text.is_empty() || pattern.is_match(&text)
            },
            msg,
        )
    }

    /// Require a valid email address. Empty values pass; use
    /// [`required`](Self::required) for non-empty.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| {
                let text = text_of(v);
                let text = text.trim();
                text.is_empty() || email_address::EmailAddress::is_valid(text)
            },
            msg,
        )
    }

    /// Require the value to equal another field's value.
    pub fn matches_field(self, other: impl Into<String>, msg: impl Into<String>) -> Self {
        let other = other.into();
        self.rule_with_values(
            move |v, values| v == values.get(&other).unwrap_or(&Value::Null),
            msg,
        )
    }

    // -------------------------------------------------------------------------
    // Checkbox and select rules
    // -------------------------------------------------------------------------

    /// Require the checkbox to be checked.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        self.rule(|v| v.as_bool() == Some(true), msg)
    }

    /// Require that an option is selected.
    pub fn selected(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            },
            msg,
        )
    }

    /// Require the selected id to be one of `ids`. An empty selection
    /// passes; use [`selected`](Self::selected) for that.
    pub fn one_of(self, ids: impl IntoIterator<Item = i64>, msg: impl Into<String>) -> Self {
        let ids: BTreeSet<i64> = ids.into_iter().collect();
        self.rule(
            move |v| match v {
                Value::Null => true,
                Value::String(s) if s.trim().is_empty() => true,
                v => id_of(v).is_some_and(|id| ids.contains(&id)),
            },
            msg,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_treats_blank_as_missing() {
        let validator = Validator::new().field("title").required("Required").build();
        assert!(validator.validate(&Row::new()).is_invalid());
        assert!(validator.validate(&Row::new().set("title", "   ")).is_invalid());
        assert!(validator.validate(&Row::new().set("title", "ok")).is_valid());
        assert!(validator.validate(&Row::new().set("title", 0i64)).is_valid());
    }

    #[test]
    fn test_only_first_error_per_field() {
        let result = Validator::new()
            .field("title")
            .required("Required")
            .min_length(5, "Too short")
            .validate(&Row::new());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.error_for("title"), Some("Required"));
    }

    #[test]
    fn test_length_counts_chars() {
        let validator = Validator::new()
            .field("name")
            .min_length(3, "Too short")
            .max_length(4, "Too long")
            .build();
        assert!(validator.validate(&Row::new().set("name", "äöü")).is_valid());
        assert!(validator.validate(&Row::new().set("name", "äöüßx")).is_invalid());
    }

    #[test]
    fn test_email_and_pattern_allow_empty() {
        let validator = Validator::new()
            .field("email")
            .email("Invalid email")
            .field("phone")
            .pattern(Regex::new(r"^\+?[0-9 ]+$").unwrap(), "Invalid phone")
            .build();

        assert!(validator.validate(&Row::new()).is_valid());
        let result = validator.validate(&Row::new().set("email", "nope").set("phone", "12a"));
        assert_eq!(result.error_for("email"), Some("Invalid email"));
        assert_eq!(result.error_for("phone"), Some("Invalid phone"));
        assert!(
            validator
                .validate(&Row::new().set("email", "it@example.com").set("phone", "+31 20"))
                .is_valid()
        );
    }

    #[test]
    fn test_select_rules() {
        let validator = Validator::new()
            .field("branch_id")
            .selected("Select a branch")
            .one_of([1, 2], "Unknown branch")
            .field("accept")
            .checked("Must accept")
            .build();

        let result = validator.validate(&Row::new().set("branch_id", "3"));
        assert_eq!(result.error_for("branch_id"), Some("Unknown branch"));
        assert_eq!(result.error_for("accept"), Some("Must accept"));

        let values = Row::new().set("branch_id", "2").set("accept", true);
        assert!(validator.validate(&values).is_valid());
    }

    #[test]
    fn test_merge_reports_field_once() {
        let first = Validator::new().field("title").required("Required").build();
        let second = Validator::new().field("title").min_length(5, "Too short").build();
        let merged = first.merge(second);

        let result = merged.validate(&Row::new());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.error_for("title"), Some("Required"));

        let result = merged.validate(&Row::new().set("title", "abc"));
        assert_eq!(result.error_for("title"), Some("Too short"));
    }

    #[test]
    fn test_into_field_errors() {
        let errors = Validator::new()
            .field("a")
            .required("A")
            .field("b")
            .required("B")
            .validate(&Row::new())
            .into_field_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("b"), Some("B"));
    }
}
