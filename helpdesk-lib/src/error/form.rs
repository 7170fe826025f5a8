//! Multi-step form error types

use super::BridgeError;
use super::FieldErrors;

/// Errors from form transitions and submission.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The form is closed; open it before interacting.
    #[error("Form is closed")]
    Closed,

    /// Submission is only allowed from the final step.
    #[error("Cannot submit from step {step} of {total}")]
    NotOnFinalStep { step: usize, total: usize },

    /// A submission is already outstanding.
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    /// `finish_submit` was called without a pending submission.
    #[error("No submission in progress")]
    NotSubmitting,

    /// Local validation failed; the messages are also stored on the form.
    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),

    /// The backend call failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
