//! Entry detail routes.
//!
//! Handles `GET /articles/{slug}`, `GET /projects/{slug}` and
//! `GET /experience/{slug}`, plus the HTML response builder every page
//! route shares.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::SiteError;
use crate::model::ContentType;
use crate::render;
use crate::resolve::Resolution;
use crate::state::AppState;

/// How a page response may be cached downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Shared caches may keep the page for the revalidation window and serve
    /// it stale for another window while they refetch.
    Revalidate(Duration),
    /// Per-visitor output (form results) must not be stored.
    NoStore,
}

pub async fn article_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, SiteError> {
    entry_page(&state, ContentType::Article, &slug).await
}

pub async fn project_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, SiteError> {
    entry_page(&state, ContentType::Project, &slug).await
}

pub async fn experience_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, SiteError> {
    entry_page(&state, ContentType::Experience, &slug).await
}

async fn entry_page(
    state: &AppState,
    content_type: ContentType,
    slug: &str,
) -> Result<Response, SiteError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(SiteError::NotFound(content_type.path_for(slug)));
    }

    match state.resolver.resolve_entry(content_type, slug).await? {
        Resolution::Found(entry) => {
            let html = render::entry::render(&state.config, &entry).into_string();
            Ok(build_response(
                StatusCode::OK,
                html,
                CachePolicy::Revalidate(state.resolver.revalidate()),
            ))
        }
        Resolution::NotFound => Err(SiteError::NotFound(content_type.path_for(slug))),
    }
}

/// Build an HTTP response with HTML content and security/cache headers.
pub fn build_response(status: StatusCode, html: String, cache: CachePolicy) -> Response {
    let mut headers = HeaderMap::new();

    // Content type
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // ETag (xxHash of content)
    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(val) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, val);
    }

    if let Ok(val) = HeaderValue::from_str(&cache_control(cache)) {
        headers.insert(header::CACHE_CONTROL, val);
    }

    (status, headers, html).into_response()
}

fn cache_control(cache: CachePolicy) -> String {
    match cache {
        CachePolicy::Revalidate(window) => {
            let secs = window.as_secs();
            format!("public, max-age=0, s-maxage={secs}, stale-while-revalidate={secs}")
        }
        CachePolicy::NoStore => "no-store".to_string(),
    }
}
