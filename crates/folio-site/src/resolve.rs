//! Page resolution.
//!
//! Turns a route, a `(content type, slug)` pair, into the content entry that
//! renders it. Results are served through a [`RevalidatingCache`], so once a
//! route has resolved at least once its requests never wait on the backend.
//!
//! Routes are enumerated up front (see [`PageResolver::warm`]), but a slug
//! missing from the last enumeration is still resolved on demand, so newly
//! published entries are reachable without a re-enumeration.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::RevalidatingCache;
use crate::model::{ContentEntry, ContentType};
use crate::query::{ContentError, ContentQuery, ContentSource, MAX_PAGE_SIZE};

/// Outcome of resolving one route.
#[derive(Debug, Clone)]
pub enum Resolution {
    Found(Arc<ContentEntry>),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Summary of a [`PageResolver::warm`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmReport {
    pub routes: usize,
    pub resolved: usize,
    pub failed: usize,
}

/// Resolves routes and listings against a [`ContentSource`].
#[derive(Clone)]
pub struct PageResolver {
    source: Arc<dyn ContentSource>,
    entries: RevalidatingCache<Arc<ContentEntry>>,
    lists: RevalidatingCache<Arc<Vec<ContentEntry>>>,
    known_routes: Arc<RwLock<HashMap<ContentType, BTreeSet<String>>>>,
}

impl PageResolver {
    pub fn new(source: Arc<dyn ContentSource>, revalidate: Duration) -> Self {
        Self {
            source,
            entries: RevalidatingCache::new(revalidate),
            lists: RevalidatingCache::new(revalidate),
            known_routes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The revalidation window.
    pub fn revalidate(&self) -> Duration {
        self.entries.window()
    }

    /// All slugs of a content type, paging through the backend.
    ///
    /// An empty content type yields an empty list.
    pub async fn enumerate_routes(
        &self,
        content_type: ContentType,
    ) -> Result<Vec<String>, ContentError> {
        let mut slugs = BTreeSet::new();
        let mut skip = 0u32;

        loop {
            let page = self
                .source
                .query(&ContentQuery::slugs(content_type, skip))
                .await?;
            let fetched = page.entries.len() as u32;
            slugs.extend(page.entries.into_iter().map(|e| e.slug));

            skip += fetched;
            if fetched < MAX_PAGE_SIZE || u64::from(skip) >= page.total {
                break;
            }
        }

        tracing::debug!(content_type = %content_type, routes = slugs.len(), "routes enumerated");
        self.known_routes
            .write()
            .insert(content_type, slugs.clone());

        Ok(slugs.into_iter().collect())
    }

    /// Whether `slug` was present at the last enumeration of its type.
    pub fn is_known_route(&self, content_type: ContentType, slug: &str) -> bool {
        self.known_routes
            .read()
            .get(&content_type)
            .is_some_and(|slugs| slugs.contains(slug))
    }

    /// Resolve the single entry behind a route.
    pub async fn resolve_entry(
        &self,
        content_type: ContentType,
        slug: &str,
    ) -> Result<Resolution, ContentError> {
        if !self.is_known_route(content_type, slug) {
            tracing::debug!(content_type = %content_type, slug = %slug, "route not enumerated, resolving on demand");
        }

        let source = Arc::clone(&self.source);
        let query = ContentQuery::by_slug(content_type, slug);
        let key = format!("entry:{}:{}", content_type.id(), slug);

        let found = self
            .entries
            .get_or_resolve(&key, move || {
                let source = Arc::clone(&source);
                let query = query.clone();
                async move {
                    let page = source.query(&query).await?;
                    Ok::<_, ContentError>(page.entries.into_iter().next().map(Arc::new))
                }
            })
            .await?;

        match found {
            Some(entry) => {
                self.known_routes
                    .write()
                    .entry(content_type)
                    .or_default()
                    .insert(entry.slug.clone());
                Ok(Resolution::Found(entry))
            }
            None => Ok(Resolution::NotFound),
        }
    }

    /// The home page listing for a content type.
    pub async fn resolve_list(
        &self,
        content_type: ContentType,
    ) -> Result<Arc<Vec<ContentEntry>>, ContentError> {
        let source = Arc::clone(&self.source);
        let key = format!("list:{}", content_type.id());

        let list = self
            .lists
            .get_or_resolve(&key, move || {
                let source = Arc::clone(&source);
                async move {
                    let page = source.query(&ContentQuery::summary(content_type)).await?;
                    Ok::<_, ContentError>(Some(Arc::new(page.entries)))
                }
            })
            .await?;

        Ok(list.unwrap_or_default())
    }

    /// Enumerate every content type and resolve every route once.
    ///
    /// Failures are logged and counted; the site still serves on demand.
    pub async fn warm(&self) -> WarmReport {
        let mut report = WarmReport::default();

        for content_type in ContentType::ALL {
            let slugs = match self.enumerate_routes(content_type).await {
                Ok(slugs) => slugs,
                Err(e) => {
                    tracing::warn!(content_type = %content_type, error = %e, "route enumeration failed");
                    report.failed += 1;
                    continue;
                }
            };

            for slug in slugs {
                report.routes += 1;
                match self.resolve_entry(content_type, &slug).await {
                    Ok(Resolution::Found(_)) => report.resolved += 1,
                    Ok(Resolution::NotFound) => {
                        tracing::warn!(content_type = %content_type, slug = %slug, "enumerated route did not resolve");
                        report.failed += 1;
                    }
                    Err(e) => {
                        tracing::warn!(content_type = %content_type, slug = %slug, error = %e, "route resolution failed");
                        report.failed += 1;
                    }
                }
            }

            if let Err(e) = self.resolve_list(content_type).await {
                tracing::warn!(content_type = %content_type, error = %e, "listing resolution failed");
            }
        }

        tracing::info!(
            routes = report.routes,
            resolved = report.resolved,
            failed = report.failed,
            "pages pre-resolved"
        );
        report
    }
}
