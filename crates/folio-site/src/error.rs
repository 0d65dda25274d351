//! Error types for page routes.
//!
//! Errors are rendered as simple HTML error pages rather than JSON, since
//! pages are user-facing. The contact endpoint has its own JSON error type,
//! [`crate::contact::ContactError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::query::ContentError;
use crate::render::components::error_page;

/// Page error type.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No entry exists for the requested route.
    #[error("not found: {0}")]
    NotFound(String),

    /// The content backend failed and nothing cached could stand in.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Internal server error (rendering, startup wiring, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound(what) => {
                tracing::debug!(what = %what, "page not found");
                (
                    StatusCode::NOT_FOUND,
                    "Not Found",
                    "The page you are looking for does not exist.",
                )
            }
            Self::Content(err) => {
                tracing::error!(error = %err, "content backend error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "This page could not be loaded. Please try again later.",
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "This page could not be loaded. Please try again later.",
                )
            }
        };

        (status, error_page(title, message)).into_response()
    }
}
