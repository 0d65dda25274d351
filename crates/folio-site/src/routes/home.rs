//! Home page route.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use super::entry::{CachePolicy, build_response};
use crate::contact::ContactForm;
use crate::listing::{self, SortDirection};
use crate::model::{ContentEntry, ContentType};
use crate::render::home::{HomePage, ListState};
use crate::state::AppState;

/// Query parameters of `GET /`. Unknown sort values fall back to ascending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub article_q: Option<String>,
    #[serde(default)]
    pub article_sort: Option<String>,
    #[serde(default)]
    pub project_q: Option<String>,
    #[serde(default)]
    pub project_sort: Option<String>,
}

impl HomeQuery {
    fn article_state(&self) -> ListState {
        list_state(self.article_q.as_deref(), self.article_sort.as_deref())
    }

    fn project_state(&self) -> ListState {
        list_state(self.project_q.as_deref(), self.project_sort.as_deref())
    }
}

fn list_state(term: Option<&str>, sort: Option<&str>) -> ListState {
    ListState {
        term: term.unwrap_or_default().to_string(),
        direction: match sort {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        },
    }
}

/// Render the home page.
pub async fn home_page(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Response {
    let html = render_home(&state, &query, &ContactForm::new()).await;
    build_response(
        StatusCode::OK,
        html,
        CachePolicy::Revalidate(state.resolver.revalidate()),
    )
}

/// Render the home page with the given list state and contact form.
///
/// A listing that cannot be resolved is logged and shown as empty; the rest
/// of the page still renders.
pub(super) async fn render_home(state: &AppState, query: &HomeQuery, form: &ContactForm) -> String {
    let (experiences, articles, projects) = tokio::join!(
        listing_or_empty(state, ContentType::Experience),
        listing_or_empty(state, ContentType::Article),
        listing_or_empty(state, ContentType::Project),
    );

    let article_state = query.article_state();
    let project_state = query.project_state();

    let page = HomePage {
        experiences: experiences.as_slice(),
        articles: listing::view(articles.as_slice(), &article_state.term, article_state.direction),
        article_state: &article_state,
        projects: listing::view(projects.as_slice(), &project_state.term, project_state.direction),
        project_state: &project_state,
        form,
    };

    crate::render::home::render(&state.config, &page).into_string()
}

async fn listing_or_empty(state: &AppState, content_type: ContentType) -> Arc<Vec<ContentEntry>> {
    match state.resolver.resolve_list(content_type).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(content_type = %content_type, error = %e, "listing unavailable, rendering empty");
            Arc::default()
        }
    }
}
