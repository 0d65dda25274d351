//! Contact routes.
//!
//! `POST /api/contact` takes JSON and answers JSON `{message}`. `POST
//! /contact` takes the home page's urlencoded form and re-renders the home
//! page with the form's outcome.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Response;

use super::entry::{CachePolicy, build_response};
use super::home::{HomeQuery, render_home};
use crate::contact::{self, ContactError, ContactForm, ContactPayload, MessageBody};
use crate::state::AppState;

/// Relay a JSON contact submission.
///
/// Checks run in a fixed order: configuration, body, fields, delivery. The
/// method check happens in the router.
pub async fn api_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageBody>, ContactError> {
    let relay = state
        .contact_relay()
        .map_err(|e| ContactError::Configuration(e.clone()))?;

    let payload: ContactPayload = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "unparseable contact body");
        ContactError::Validation(contact::MISSING_FIELDS_MESSAGE.to_string())
    })?;

    let submission = payload.validate()?;
    let message = relay.relay(&submission).await?;
    Ok(Json(MessageBody { message }))
}

/// Any method other than POST on `/api/contact`.
pub async fn method_not_allowed() -> ContactError {
    ContactError::MethodNotAllowed
}

/// Relay a form post and re-render the home page with the result.
///
/// Configuration is checked before the fields, as on `/api/contact`.
pub async fn contact_form(
    State(state): State<AppState>,
    Form(payload): Form<ContactPayload>,
) -> Response {
    let mut form = ContactForm::with_values(&payload);

    let status = match state.contact_relay() {
        Err(e) => {
            let err = ContactError::Configuration(e.clone());
            err.log();
            form.complete(Err(err.public_message()));
            err.status()
        }
        Ok(relay) => match form.begin_submit() {
            Ok(payload) => {
                let outcome = contact::submit(Ok(relay), payload).await;
                let status = match &outcome {
                    Ok(_) => StatusCode::OK,
                    Err(e) => {
                        e.log();
                        e.status()
                    }
                };
                form.complete(outcome.map_err(|e| e.public_message()));
                status
            }
            Err(_) => StatusCode::BAD_REQUEST,
        },
    };

    let html = render_home(&state, &HomeQuery::default(), &form).await;
    build_response(status, html, CachePolicy::NoStore)
}
