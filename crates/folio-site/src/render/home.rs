//! Home page: intro, experiences, filterable article list, project gallery
//! and the contact form.
//!
//! Filter and sort state travels in the query string. Each list's controls
//! are a plain GET form that carries the other list's state in hidden
//! fields, so the page works without scripts.

use maud::{Markup, html};

use super::components::{PageMeta, entry_card, page_shell};
use crate::config::Config;
use crate::contact::{ContactForm, SubmissionStatus};
use crate::listing::SortDirection;
use crate::model::ContentEntry;

/// Filter and sort state of one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub term: String,
    pub direction: SortDirection,
}

/// Everything the home page shows, already filtered and sorted.
pub struct HomePage<'a> {
    pub experiences: &'a [ContentEntry],
    pub articles: Vec<&'a ContentEntry>,
    pub article_state: &'a ListState,
    pub projects: Vec<&'a ContentEntry>,
    pub project_state: &'a ListState,
    pub form: &'a ContactForm,
}

/// Which list a set of controls drives; names its query parameters.
#[derive(Clone, Copy)]
enum ListKind {
    Articles,
    Projects,
}

impl ListKind {
    fn term_param(self) -> &'static str {
        match self {
            Self::Articles => "article_q",
            Self::Projects => "project_q",
        }
    }

    fn sort_param(self) -> &'static str {
        match self {
            Self::Articles => "article_sort",
            Self::Projects => "project_sort",
        }
    }

    fn anchor(self) -> &'static str {
        match self {
            Self::Articles => "/#articles",
            Self::Projects => "/#gallery",
        }
    }
}

pub fn render(config: &Config, page: &HomePage<'_>) -> Markup {
    let meta = PageMeta {
        title: &config.site_name,
        description: &config.tagline,
        path: "/",
        og_type: "website",
        image: None,
    };

    let body = html! {
        section class="intro" {
            h1 { (config.owner_name) }
            p { (config.tagline) }
        }

        section id="experience" {
            h2 { "Work Experience" }
            @if page.experiences.is_empty() {
                p class="empty" { "No experiences found." }
            } @else {
                div class="cards" {
                    @for entry in page.experiences {
                        (entry_card(entry, false))
                    }
                }
            }
        }

        section id="articles" {
            h2 { "Articles" }
            (list_controls(ListKind::Articles, page.article_state, page.project_state))
            @if page.articles.is_empty() {
                p class="empty" { "No articles found." }
            } @else {
                div class="cards" {
                    @for entry in &page.articles {
                        (entry_card(entry, false))
                    }
                }
            }
        }

        section id="gallery" {
            h2 { "Gallery" }
            (list_controls(ListKind::Projects, page.project_state, page.article_state))
            @if page.projects.is_empty() {
                p class="empty" { "No projects found." }
            } @else {
                div class="cards grid" {
                    @for entry in &page.projects {
                        (entry_card(entry, true))
                    }
                }
            }
        }

        (contact_section(page.form))
    };

    page_shell(config, &meta, body)
}

/// Search box plus Asc/Desc toggles for one list.
///
/// Every submit button carries the sort parameter, so exactly one value is
/// sent. The first button keeps the current direction and is the one a
/// browser uses when Enter is pressed in the search box.
fn list_controls(kind: ListKind, own: &ListState, other: &ListState) -> Markup {
    let other_kind = match kind {
        ListKind::Articles => ListKind::Projects,
        ListKind::Projects => ListKind::Articles,
    };

    html! {
        form class="list-controls" method="get" action=(kind.anchor()) {
            input type="search" name=(kind.term_param()) value=(own.term)
                placeholder="Search by tag..." aria-label="Search by tag";
            @if !other.term.is_empty() {
                input type="hidden" name=(other_kind.term_param()) value=(other.term);
            }
            input type="hidden" name=(other_kind.sort_param()) value=(other.direction.as_str());
            button type="submit" name=(kind.sort_param()) value=(own.direction.as_str()) { "Search" }
            @for (direction, label) in [(SortDirection::Ascending, "Asc"), (SortDirection::Descending, "Desc")] {
                @let active = own.direction == direction;
                button type="submit" name=(kind.sort_param()) value=(direction.as_str())
                    class=[active.then_some("active")] aria-pressed=(if active { "true" } else { "false" }) { (label) }
            }
        }
    }
}

fn contact_section(form: &ContactForm) -> Markup {
    let feedback_class = match form.status() {
        SubmissionStatus::Success => "feedback success",
        _ => "feedback error",
    };

    html! {
        section id="contact" class="contact" {
            h2 { "Contact" }
            form method="post" action="/contact" {
                label {
                    "Name"
                    input type="text" name="name" value=(form.name) required;
                }
                label {
                    "Email"
                    input type="email" name="email" value=(form.email) required;
                }
                label {
                    "Message"
                    textarea name="message" required { (form.message) }
                }
                button type="submit" disabled[form.is_submit_disabled()] { (form.submit_label()) }
                @if let Some(feedback) = form.feedback() {
                    p class=(feedback_class) role="status" { (feedback) }
                }
            }
        }
    }
}
