//! Folio - a content-backed portfolio site.
//!
//! This crate serves a personal portfolio (work experience, articles and a
//! project gallery) whose content lives in a headless CMS, plus a contact
//! form that relays messages by email. It is designed to sit behind a CDN:
//! every page carries `s-maxage`/`stale-while-revalidate` headers matching
//! the in-process revalidation window.
//!
//! # Architecture
//!
//! - **Query**: Typed queries against the Contentful delivery API, or a local fixture
//! - **Normalize**: Per-type backend fields folded into one [`model::ContentEntry`]
//! - **Resolve**: Routes enumerated up front, served from a stale-while-revalidate
//!   cache, and resolved on demand when new
//! - **Render**: Pages and rich text rendered with maud (compile-time templates)
//! - **Contact**: Validated submissions relayed once through the Resend API
//!
//! # URL Pattern
//!
//! ```text
//! GET  /
//! GET  /articles/{slug}
//! GET  /projects/{slug}
//! GET  /experience/{slug}
//! POST /api/contact
//! ```
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - Rich-text links and images are restricted to safe URL schemes
//! - Strict Content-Security-Policy: no JavaScript execution
//! - X-Frame-Options: DENY prevents clickjacking

pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod fixture;
pub mod listing;
pub mod model;
pub mod normalize;
pub mod query;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
