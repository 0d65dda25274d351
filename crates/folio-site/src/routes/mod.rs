//! Route definitions.
//!
//! ## Routes
//!
//! - `GET /` - Home page (`article_q`, `article_sort`, `project_q`, `project_sort`)
//! - `GET /articles/{slug}`, `/projects/{slug}`, `/experience/{slug}` - Entry pages
//! - `POST /api/contact` - Contact relay (JSON); other methods get a JSON 405
//! - `POST /contact` - Contact relay (HTML form)
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//!
//! Everything else is an HTML 404.

mod contact;
mod entry;
mod health;
mod home;

pub use entry::{CachePolicy, build_response};
pub use home::HomeQuery;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use crate::error::SiteError;
use crate::state::AppState;

/// Build the complete site router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/articles/{slug}", get(entry::article_page))
        .route("/projects/{slug}", get(entry::project_page))
        .route("/experience/{slug}", get(entry::experience_page))
        .route(
            "/api/contact",
            post(contact::api_contact).fallback(contact::method_not_allowed),
        )
        .route("/contact", post(contact::contact_form))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .fallback(not_found)
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

async fn not_found() -> SiteError {
    SiteError::NotFound("no route".to_string())
}
