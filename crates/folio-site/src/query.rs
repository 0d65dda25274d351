//! Content query layer.
//!
//! [`ContentSource`] is the read-only contract the rest of the site uses to
//! pull entries: a content type, an optional slug filter, a field projection
//! and a link-resolution depth. [`ContentfulSource`] implements it against
//! the Contentful Content Delivery API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::{ContentEntry, ContentType};
use crate::normalize::{RawCollection, normalize_collection};

/// Largest page size the delivery API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Link depth requested when resolving a single page.
///
/// Deep enough for entry → asset and entry → entry → asset chains.
pub const RESOLVE_DEPTH: u8 = 2;

/// Which fields to bring back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Only `sys.id` and `fields.slug`, for route enumeration.
    Slugs,
    /// The fields shown on the home page listing.
    Summary,
    /// Everything.
    Full,
}

/// A query against one content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub content_type: ContentType,
    /// Exact-match filter on `fields.slug`.
    pub slug: Option<String>,
    pub projection: Projection,
    pub limit: Option<u32>,
    pub skip: u32,
    /// Link resolution depth (0 leaves links unresolved).
    pub include: u8,
}

impl ContentQuery {
    /// One page of slugs for route enumeration.
    pub fn slugs(content_type: ContentType, skip: u32) -> Self {
        Self {
            content_type,
            slug: None,
            projection: Projection::Slugs,
            limit: Some(MAX_PAGE_SIZE),
            skip,
            include: 0,
        }
    }

    /// The home page listing for a type.
    pub fn summary(content_type: ContentType) -> Self {
        Self {
            content_type,
            slug: None,
            projection: Projection::Summary,
            limit: None,
            skip: 0,
            include: 1,
        }
    }

    /// Exactly one fully-resolved entry by slug.
    pub fn by_slug(content_type: ContentType, slug: &str) -> Self {
        Self {
            content_type,
            slug: Some(slug.to_string()),
            projection: Projection::Full,
            limit: Some(1),
            skip: 0,
            include: RESOLVE_DEPTH,
        }
    }

    /// Value of the `select` parameter, if the projection narrows fields.
    pub fn select(&self) -> Option<String> {
        match self.projection {
            Projection::Slugs => Some("sys.id,fields.slug".to_string()),
            Projection::Summary => Some(self.content_type.summary_fields().join(",")),
            Projection::Full => None,
        }
    }

    /// Query-string parameters for the delivery API.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("content_type", self.content_type.id().to_string())];
        if let Some(select) = self.select() {
            params.push(("select", select));
        }
        if let Some(slug) = &self.slug {
            params.push(("fields.slug", slug.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if self.skip > 0 {
            params.push(("skip", self.skip.to_string()));
        }
        params.push(("include", self.include.to_string()));
        params
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub entries: Vec<ContentEntry>,
    /// Total matching entries on the backend, across all pages.
    pub total: u64,
}

/// Content backend errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Transport-level failure talking to the backend.
    #[error("content backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("content backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not a collection.
    #[error("content backend response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Fixture file could not be read.
    #[error("content fixture unavailable: {0}")]
    Fixture(#[from] std::io::Error),
}

/// Read-only access to the content backend.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn query(&self, query: &ContentQuery) -> Result<QueryPage, ContentError>;
}

/// Connection settings for the Contentful delivery API.
#[derive(Clone)]
pub struct ContentfulSettings {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    /// API origin, e.g. `https://cdn.contentful.com`.
    pub api_base: String,
    pub locale: Option<String>,
}

impl std::fmt::Debug for ContentfulSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentfulSettings")
            .field("space_id", &self.space_id)
            .field("access_token", &"<redacted>")
            .field("environment", &self.environment)
            .field("api_base", &self.api_base)
            .field("locale", &self.locale)
            .finish()
    }
}

/// Error body returned by the delivery API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`ContentSource`] backed by the Contentful Content Delivery API.
#[derive(Clone)]
pub struct ContentfulSource {
    http: reqwest::Client,
    settings: ContentfulSettings,
}

impl ContentfulSource {
    pub fn new(settings: ContentfulSettings) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("folio-site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, settings })
    }

    fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.space_id,
            self.settings.environment,
        )
    }
}

#[async_trait]
impl ContentSource for ContentfulSource {
    async fn query(&self, query: &ContentQuery) -> Result<QueryPage, ContentError> {
        let mut params = query.params();
        if let Some(locale) = &self.settings.locale {
            params.push(("locale", locale.clone()));
        }

        tracing::debug!(
            content_type = %query.content_type,
            slug = ?query.slug,
            projection = ?query.projection,
            skip = query.skip,
            "querying content backend"
        );

        let response = self
            .http
            .get(self.entries_url())
            .bearer_auth(&self.settings.access_token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ContentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let raw: RawCollection = serde_json::from_slice(&body)?;
        let total = raw.total;
        let entries = normalize_collection(raw, query.content_type);

        Ok(QueryPage { entries, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn slug_query_projects_only_slugs() {
        let params = ContentQuery::slugs(ContentType::Article, 0).params();
        assert_eq!(param(&params, "content_type"), Some("article"));
        assert_eq!(param(&params, "select"), Some("sys.id,fields.slug"));
        assert_eq!(param(&params, "limit"), Some("1000"));
        assert_eq!(param(&params, "skip"), None);
        assert_eq!(param(&params, "include"), Some("0"));
    }

    #[test]
    fn slug_query_pages_with_skip() {
        let params = ContentQuery::slugs(ContentType::Project, 2000).params();
        assert_eq!(param(&params, "skip"), Some("2000"));
    }

    #[test]
    fn by_slug_resolves_links_and_selects_everything() {
        let params = ContentQuery::by_slug(ContentType::Experience, "acme").params();
        assert_eq!(param(&params, "content_type"), Some("experience"));
        assert_eq!(param(&params, "fields.slug"), Some("acme"));
        assert_eq!(param(&params, "limit"), Some("1"));
        assert_eq!(param(&params, "include"), Some("2"));
        assert_eq!(param(&params, "select"), None);
    }

    #[test]
    fn summary_select_is_per_type() {
        let article = ContentQuery::summary(ContentType::Article).select().unwrap();
        assert!(article.contains("fields.excerpt"));
        assert!(article.contains("fields.tags"));

        let project = ContentQuery::summary(ContentType::Project).select().unwrap();
        assert!(project.contains("fields.thumbnail"));

        let experience = ContentQuery::summary(ContentType::Experience)
            .select()
            .unwrap();
        assert_eq!(experience, "sys.id,fields.title,fields.slug");
    }

    #[test]
    fn entries_url_trims_trailing_slash() {
        let source = ContentfulSource::new(ContentfulSettings {
            space_id: "space".to_string(),
            access_token: "token".to_string(),
            environment: "master".to_string(),
            api_base: "https://cdn.contentful.com/".to_string(),
            locale: None,
        })
        .unwrap();
        assert_eq!(
            source.entries_url(),
            "https://cdn.contentful.com/spaces/space/environments/master/entries"
        );
    }

    #[test]
    fn settings_debug_redacts_token() {
        let settings = ContentfulSettings {
            space_id: "space".to_string(),
            access_token: "secret-token".to_string(),
            environment: "master".to_string(),
            api_base: "https://cdn.contentful.com".to_string(),
            locale: None,
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
