//! Multi-step dialog forms and their field validation.

mod presets;
pub mod validation;
mod wizard;

pub use presets::{ticket_wizard, user_edit_form, user_form};
pub use wizard::{FormStep, MultiStepForm};
