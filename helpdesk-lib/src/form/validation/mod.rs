//! Field validation for forms.
//!
//! Validators are built once per form step and run against the current
//! field values every time the user tries to advance or submit.
//!
//! # Example
//!
//! ```
//! use helpdesk_lib::form::validation::Validator;
//! use helpdesk_lib::model::Row;
//!
//! let validator = Validator::new()
//!     .field("title")
//!         .required("Title is required")
//!         .min_length(5, "Title must be at least 5 characters")
//!     .field("contact_email")
//!         .email("Please enter a valid email")
//!     .build();
//!
//! let values = Row::new().set("title", "VPN").set("contact_email", "");
//! let result = validator.validate(&values);
//! assert_eq!(
//!     result.first_error().map(|e| e.message.as_str()),
//!     Some("Title must be at least 5 characters")
//! );
//! ```

mod result;
mod validator;

pub use result::{FieldError, ValidationResult};
pub use validator::{FieldBuilder, Validator};
