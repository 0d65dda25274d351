//! Contact relay.
//!
//! A submission is three required fields. It is validated, turned into a
//! notification email, handed to the [`EmailSender`] once, and discarded.
//! Nothing is persisted and nothing is retried: failures go straight back
//! to the submitter, who can resubmit.

pub mod email;
pub mod form;

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ContactConfig};

pub use self::email::{DeliveryError, EmailSender, OutgoingEmail, ResendClient};
pub use self::form::{ContactForm, FormField, SubmissionStatus};

/// Confirmation returned after a successful relay.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// Validation message for missing fields.
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required.";

/// Raw request body. Every field is optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactPayload {
    /// Check that all three fields are present and not blank.
    pub fn validate(self) -> Result<ContactSubmission, ContactError> {
        let present = |field: Option<String>| field.filter(|v| !v.trim().is_empty());

        match (present(self.name), present(self.email), present(self.message)) {
            (Some(name), Some(email), Some(message)) => Ok(ContactSubmission {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                message,
            }),
            _ => Err(ContactError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

/// A validated submission. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact flow errors. Each maps to a status and a message for the submitter.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Relay settings are missing; details stay in the server log.
    #[error("contact relay not configured: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{0}")]
    Validation(String),

    /// The email provider refused the message.
    #[error("{0}")]
    Delivery(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DeliveryError> for ContactError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Rejected(message) => Self::Delivery(message),
            DeliveryError::Transport(e) => Self::Internal(e.into()),
        }
    }
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::Delivery(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The message shown to the submitter. Never includes server internals.
    pub fn public_message(&self) -> String {
        match self {
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::Configuration(_) => "Server configuration error.".to_string(),
            Self::Validation(msg) | Self::Delivery(msg) => msg.clone(),
            Self::Internal(_) => "Something went wrong.".to_string(),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            Self::Configuration(err) => {
                tracing::error!(error = %err, "contact relay is missing configuration");
            }
            Self::Internal(err) => tracing::error!(error = %err, "contact relay failed"),
            Self::Delivery(msg) => tracing::warn!(message = %msg, "email provider rejected message"),
            Self::MethodNotAllowed | Self::Validation(_) => {}
        }
    }
}

/// JSON body of every contact endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        let body = MessageBody {
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Forwards validated submissions to the email provider.
#[derive(Clone)]
pub struct ContactRelay {
    config: ContactConfig,
    sender: Arc<dyn EmailSender>,
}

impl ContactRelay {
    pub fn new(config: ContactConfig, sender: Arc<dyn EmailSender>) -> Self {
        Self { config, sender }
    }

    /// Relay one submission, returning the confirmation message.
    pub async fn relay(&self, submission: &ContactSubmission) -> Result<String, ContactError> {
        let email = email::compose(submission, &self.config.from, &self.config.to_email);
        let id = self.sender.send(&email).await?;
        tracing::info!(message_id = %id, "contact message relayed");
        Ok(SUCCESS_MESSAGE.to_string())
    }
}

/// Validate and relay a payload through an optional relay.
///
/// `relay` is `Err` when contact settings failed validation at startup.
pub async fn submit(
    relay: Result<&ContactRelay, &ConfigError>,
    payload: ContactPayload,
) -> Result<String, ContactError> {
    let relay = relay.map_err(|e| ContactError::Configuration(e.clone()))?;
    let submission = payload.validate()?;
    relay.relay(&submission).await
}
