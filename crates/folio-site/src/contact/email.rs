//! Email delivery through the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use maud::{DOCTYPE, Markup, html};
use serde::{Deserialize, Serialize};

use super::ContactSubmission;

/// A message ready to hand to the delivery provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub reply_to: String,
    pub html: String,
    pub text: String,
}

/// Email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The provider refused the message; carries the provider's own message.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached, or answered with garbage.
    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send the message, returning the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String, DeliveryError>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// [`EmailSender`] for the Resend API (`POST /emails`).
#[derive(Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl ResendClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("folio-site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, DeliveryError> {
        let response = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: SendResponse = response.json().await?;
            return Ok(body.id);
        }

        let body = response.bytes().await?;
        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("Email provider returned {}", status.as_u16()));
        Err(DeliveryError::Rejected(message))
    }
}

/// Build the notification email for a submission.
pub fn compose(submission: &ContactSubmission, from: &str, to: &str) -> OutgoingEmail {
    OutgoingEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        subject: format!("New message from {}", submission.name),
        reply_to: submission.email.clone(),
        html: render_html(submission).into_string(),
        text: render_text(submission),
    }
}

fn render_html(submission: &ContactSubmission) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head { meta charset="utf-8"; }
            body style="background-color:#f6f9fc;padding:20px;font-family:Arial,sans-serif" {
                div style="background-color:#ffffff;border:1px solid #f0f0f0;border-radius:4px;margin:0 auto;padding:20px;max-width:600px" {
                    h2 style="color:#333" { "New Contact Form Submission" }
                    p style="color:#555" {
                        "You have received a new message from your portfolio contact form."
                    }
                    hr style="border-color:#e6ebf1;margin:20px 0";
                    p { strong { "From:" } " " (submission.name) }
                    p {
                        strong { "Email:" } " "
                        a href={ "mailto:" (submission.email) } { (submission.email) }
                    }
                    hr style="border-color:#e6ebf1;margin:20px 0";
                    h3 style="color:#333" { "Message:" }
                    p style="white-space:pre-wrap;color:#555" { (submission.message) }
                }
            }
        }
    }
}

fn render_text(submission: &ContactSubmission) -> String {
    format!(
        "New Contact Form Submission\n\nFrom: {}\nEmail: {}\n\nMessage:\n{}\n",
        submission.name, submission.email, submission.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            message: "Hi <there>\nsecond line".to_string(),
        }
    }

    #[test]
    fn compose_addresses_owner_and_replies_to_sender() {
        let email = compose(&submission(), "Site <site@example.com>", "owner@example.com");
        assert_eq!(email.from, "Site <site@example.com>");
        assert_eq!(email.to, vec!["owner@example.com"]);
        assert_eq!(email.subject, "New message from Ana");
        assert_eq!(email.reply_to, "ana@x.com");
    }

    #[test]
    fn html_escapes_message() {
        let email = compose(&submission(), "a@b.c", "d@e.f");
        assert!(email.html.contains("Hi &lt;there&gt;"));
        assert!(!email.html.contains("<there>"));
        assert!(email.html.contains("mailto:ana@x.com"));
        assert!(email.html.contains("New Contact Form Submission"));
    }

    #[test]
    fn text_alternative_keeps_message() {
        let email = compose(&submission(), "a@b.c", "d@e.f");
        assert!(email.text.contains("From: Ana"));
        assert!(email.text.contains("Hi <there>\nsecond line"));
    }

    #[test]
    fn serializes_provider_field_names() {
        let email = compose(&submission(), "a@b.c", "d@e.f");
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["reply_to"], "ana@x.com");
        assert_eq!(json["to"][0], "d@e.f");
    }

    #[test]
    fn rejected_displays_provider_message() {
        let err = DeliveryError::Rejected("Invalid `to` field".to_string());
        assert_eq!(err.to_string(), "Invalid `to` field");
    }
}
