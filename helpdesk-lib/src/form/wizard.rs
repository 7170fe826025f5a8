//! Multi-step form controller.

use log::debug;
use log::warn;

use crate::bridge::Backend;
use crate::bridge::BackendRequest;
use crate::error::BridgeError;
use crate::error::FieldErrors;
use crate::error::FormError;
use crate::model::Row;
use crate::model::Value;

use super::validation::ValidationResult;
use super::validation::Validator;

/// One step of a [`MultiStepForm`].
#[derive(Debug, Clone)]
pub struct FormStep {
    pub title: String,
    pub validator: Validator,
}

impl FormStep {
    pub fn new(title: impl Into<String>, validator: impl Into<Validator>) -> Self {
        Self {
            title: title.into(),
            validator: validator.into(),
        }
    }
}

/// A dialog form split into numbered steps.
///
/// Steps are 1-based. `next` only advances when the current step validates;
/// `previous` never validates. Submission is only possible from the last
/// step, validates every step, and allows one outstanding request at a time.
///
/// # Example
///
/// ```
/// use helpdesk_lib::form::{FormStep, MultiStepForm};
/// use helpdesk_lib::form::validation::Validator;
/// use helpdesk_lib::model::Row;
///
/// let mut form = MultiStepForm::new("New ticket", Row::new().set("title", ""))
///     .step(FormStep::new("Issue", Validator::new().field("title").required("Title is required")))
///     .step(FormStep::new("Details", Validator::new()));
///
/// assert!(form.next().is_invalid());
/// assert_eq!(form.error("title"), Some("Title is required"));
///
/// form.update_field("title", "Laptop will not boot");
/// assert_eq!(form.error("title"), None);
/// assert!(form.next().is_valid());
/// assert_eq!(form.current_step(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MultiStepForm {
    title: String,
    steps: Vec<FormStep>,
    initial: Row,
    values: Row,
    errors: FieldErrors,
    step: usize,
    submitting: bool,
    open: bool,
}

impl MultiStepForm {
    /// Create a closed form with the given default values and no steps.
    pub fn new(title: impl Into<String>, initial: Row) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            step: 1,
            submitting: false,
            open: false,
        }
    }

    /// Append a step (builder pattern).
    pub fn step(mut self, step: FormStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // -------------------------------------------------------------------------
    // Steps
    // -------------------------------------------------------------------------

    /// Current step, starting at 1.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Number of steps. A form without steps behaves as a single step.
    pub fn total_steps(&self) -> usize {
        self.steps.len().max(1)
    }

    pub fn is_first_step(&self) -> bool {
        self.step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.step == self.total_steps()
    }

    /// Title of the current step.
    pub fn step_title(&self) -> Option<&str> {
        self.steps.get(self.step - 1).map(|s| s.title.as_str())
    }

    pub fn steps(&self) -> &[FormStep] {
        &self.steps
    }

    fn step_validator(&self) -> Option<&Validator> {
        self.steps.get(self.step - 1).map(|s| &s.validator)
    }

    /// Union of every step's validator.
    pub fn full_validator(&self) -> Validator {
        self.steps
            .iter()
            .fold(Validator::new(), |all, step| all.merge(step.validator.clone()))
    }

    /// Validate the current step and advance if it passes.
    ///
    /// On failure exactly the failing fields get messages and the step is
    /// unchanged. On success all messages are cleared and the step advances,
    /// capped at the last step.
    pub fn next(&mut self) -> ValidationResult {
        let result = self
            .step_validator()
            .map(|v| v.validate(&self.values))
            .unwrap_or_default();

        if result.is_invalid() {
            debug!(
                "Form {:?}: step {} invalid ({} fields)",
                self.title,
                self.step,
                result.errors().len()
            );
            self.errors = result.clone().into_field_errors();
            return result;
        }

        self.errors.clear();
        self.step = (self.step + 1).min(self.total_steps());
        debug!("Form {:?}: step {}", self.title, self.step);
        result
    }

    /// Go back one step without validating. Clears all messages.
    pub fn previous(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
        self.errors.clear();
    }

    // -------------------------------------------------------------------------
    // Values and errors
    // -------------------------------------------------------------------------

    pub fn values(&self) -> &Row {
        &self.values
    }

    /// Current value of a field (`Null` if unset).
    pub fn value(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&Value::Null)
    }

    /// Set a field value and drop its message, without re-validating.
    pub fn update_field(&mut self, field: &str, value: impl Into<Value>) {
        self.values.insert(field, value);
        self.errors.remove(field);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    // -------------------------------------------------------------------------
    // Open / close
    // -------------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Show the form at step 1.
    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.step = 1;
            debug!("Form {:?}: opened", self.title);
        }
    }

    /// Show the form pre-filled for editing an existing record.
    ///
    /// Fields missing from `values` keep their defaults.
    pub fn open_with(&mut self, values: &Row) {
        self.reset();
        for (field, value) in values.fields() {
            self.values.insert(field, value.clone());
        }
        self.open();
    }

    /// Close the form and discard all input.
    pub fn cancel(&mut self) {
        if self.submitting {
            warn!("Form {:?}: cancelled with a submission outstanding", self.title);
        }
        self.reset();
        self.open = false;
    }

    fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.step = 1;
        self.submitting = false;
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    /// Validate every step and mark the form as submitting.
    ///
    /// Returns the JSON payload to send. Fails if the form is closed, not on
    /// its last step, already submitting, or invalid (the messages are then
    /// stored on the form as well).
    pub fn begin_submit(&mut self) -> Result<serde_json::Value, FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        if !self.is_last_step() {
            return Err(FormError::NotOnFinalStep {
                step: self.step,
                total: self.total_steps(),
            });
        }
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }

        let result = self.full_validator().validate(&self.values);
        if result.is_invalid() {
            self.errors = result.into_field_errors();
            return Err(FormError::Invalid(self.errors.clone()));
        }

        self.errors.clear();
        self.submitting = true;
        debug!("Form {:?}: submitting", self.title);
        Ok(self.values.to_json())
    }

    /// Apply the backend's answer to an outstanding submission.
    ///
    /// Success resets the form and closes it. Rejected fields are merged
    /// into the form's messages; any failure leaves the form open on its
    /// last step and is returned for the caller to report.
    pub fn finish_submit(
        &mut self,
        response: Result<serde_json::Value, BridgeError>,
    ) -> Result<serde_json::Value, FormError> {
        if !self.submitting {
            warn!("Form {:?}: response without a pending submission", self.title);
            return Err(FormError::NotSubmitting);
        }
        self.submitting = false;

        match response {
            Ok(body) => {
                debug!("Form {:?}: submitted", self.title);
                self.reset();
                self.open = false;
                Ok(body)
            }
            Err(e) => {
                warn!("Form {:?}: submission failed: {}", self.title, e);
                if let Some(errors) = e.field_errors() {
                    self.errors.merge(errors.clone());
                }
                Err(e.into())
            }
        }
    }

    /// Validate, send the payload through `backend` and apply the answer.
    ///
    /// `request` turns the payload into the request to send, e.g.
    /// `|payload| BackendRequest::post("tickets", payload)`.
    pub async fn submit<F>(
        &mut self,
        backend: &dyn Backend,
        request: F,
    ) -> Result<serde_json::Value, FormError>
    where
        F: FnOnce(serde_json::Value) -> BackendRequest,
    {
        let payload = self.begin_submit()?;
        let response = backend.send(request(payload)).await;
        self.finish_submit(response)
    }
}
