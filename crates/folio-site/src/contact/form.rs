//! Contact form state.
//!
//! Holds the three field values and the submission status across one
//! submit cycle. The site renders it server-side; the same transitions
//! drive the form whether it is posted as HTML or as JSON.

use super::{ContactPayload, MISSING_FIELDS_MESSAGE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Message,
}

/// Why a submission could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("{0}")]
    Incomplete(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    status: SubmissionStatus,
    feedback: Option<String>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with submitted values, e.g. after a failed post.
    pub fn with_values(payload: &ContactPayload) -> Self {
        Self {
            name: payload.name.clone().unwrap_or_default(),
            email: payload.email.clone().unwrap_or_default(),
            message: payload.message.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Message shown under the form after a submission finishes.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Update a field. Editing after a finished submission clears its feedback.
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Message => self.message = value,
        }
        if matches!(self.status, SubmissionStatus::Success | SubmissionStatus::Error) {
            self.status = SubmissionStatus::Idle;
            self.feedback = None;
        }
    }

    /// Start a submission, returning the payload to send.
    ///
    /// Refused while another submission is in flight. Missing fields move
    /// the form to `Error` without sending anything.
    pub fn begin_submit(&mut self) -> Result<ContactPayload, FormError> {
        if self.status == SubmissionStatus::Submitting {
            return Err(FormError::InFlight);
        }

        let blank = [&self.name, &self.email, &self.message]
            .iter()
            .any(|v| v.trim().is_empty());
        if blank {
            self.status = SubmissionStatus::Error;
            self.feedback = Some(MISSING_FIELDS_MESSAGE.to_string());
            return Err(FormError::Incomplete(MISSING_FIELDS_MESSAGE.to_string()));
        }

        self.status = SubmissionStatus::Submitting;
        self.feedback = None;
        Ok(ContactPayload {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            message: Some(self.message.clone()),
        })
    }

    /// Finish the in-flight submission with the relay's message.
    ///
    /// Success clears the fields; failure keeps them for another attempt.
    pub fn complete(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(message) => {
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.status = SubmissionStatus::Success;
                self.feedback = Some(message);
            }
            Err(message) => {
                self.status = SubmissionStatus::Error;
                self.feedback = Some(message);
            }
        }
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submit_disabled() {
            "Sending..."
        } else {
            "Send Message"
        }
    }
}
