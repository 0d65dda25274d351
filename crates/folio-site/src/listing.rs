//! Home page list view: tag filter and title sort.
//!
//! The visible list is a pure function of the source list, the search term
//! and the sort direction. It is recomputed on every request; there is no
//! cached intermediate state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::ContentEntry;

/// Title sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Anything the home page can list.
pub trait Listable {
    fn title(&self) -> &str;
    fn tags(&self) -> &[String];
}

impl Listable for ContentEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl<T: Listable + ?Sized> Listable for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

/// Keep items with at least one tag containing `term`, ignoring case.
///
/// Only the empty term keeps everything; whitespace is matched as given.
/// Items without tags never match a non-empty term.
pub fn apply_filter<'a, T: Listable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            item.tags()
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort by title. Stable: items with equal titles keep their input order in
/// both directions.
pub fn apply_sort<T: Listable>(mut items: Vec<T>, direction: SortDirection) -> Vec<T> {
    match direction {
        SortDirection::Ascending => items.sort_by(|a, b| title_order(a.title(), b.title())),
        SortDirection::Descending => items.sort_by(|a, b| title_order(b.title(), a.title())),
    }
    items
}

/// Filter then sort.
pub fn view<'a, T: Listable>(
    source: &'a [T],
    term: &str,
    direction: SortDirection,
) -> Vec<&'a T> {
    apply_sort(apply_filter(source, term), direction)
}

/// Case-insensitive title order. Titles differing only in case put the
/// lowercase letter first at the first position where they differ.
fn title_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            let upper = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
            upper(a).cmp(&upper(b))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        title: String,
        tags: Vec<String>,
    }

    impl Listable for Item {
        fn title(&self) -> &str {
            &self.title
        }

        fn tags(&self) -> &[String] {
            &self.tags
        }
    }

    fn item(title: &str, tags: &[&str]) -> Item {
        Item {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn titles(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item("Zebra", &["Design", "UX"]),
            item("apple", &["rust"]),
            item("Mango", &[]),
            item("banana", &["web design"]),
        ]
    }

    #[test]
    fn empty_term_is_identity() {
        let items = sample();
        let filtered = apply_filter(&items, "");
        assert_eq!(filtered.len(), items.len());
        for (a, b) in filtered.iter().zip(items.iter()) {
            assert_eq!(*a, b);
        }
    }

    #[test]
    fn whitespace_term_is_matched_as_given() {
        let items = sample();
        assert_eq!(titles(&apply_filter(&items, " ")), vec!["banana"]);
        assert!(apply_filter(&items, "   ").is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_both_ways() {
        let items = sample();
        let lower = titles(&apply_filter(&items, "design"));
        let upper = titles(&apply_filter(&items, "DESIGN"));
        let mixed = titles(&apply_filter(&items, "DeSiGn"));
        assert_eq!(lower, vec!["Zebra", "banana"]);
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn filter_matches_substring_of_any_tag() {
        let items = sample();
        assert_eq!(titles(&apply_filter(&items, "us")), vec!["apple"]);
        assert_eq!(titles(&apply_filter(&items, "ux")), vec!["Zebra"]);
    }

    #[test]
    fn untagged_items_never_match() {
        let items = sample();
        assert!(apply_filter(&items, "mango").is_empty());
    }

    #[test]
    fn sort_ascending_ignores_case() {
        let items = sample();
        let sorted = apply_sort(items.iter().collect(), SortDirection::Ascending);
        assert_eq!(titles(&sorted), vec!["apple", "banana", "Mango", "Zebra"]);
    }

    #[test]
    fn titles_differing_in_case_put_lowercase_first() {
        let items = vec![
            item("Apple", &[]),
            item("apple", &[]),
            item("APPLE", &[]),
            item("aPple", &[]),
        ];
        let sorted = apply_sort(items.iter().collect(), SortDirection::Ascending);
        assert_eq!(titles(&sorted), vec!["apple", "aPple", "Apple", "APPLE"]);
    }

    #[test]
    fn sort_is_idempotent() {
        let items = sample();
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let once = apply_sort(items.iter().collect(), direction);
            let twice = apply_sort(once.clone(), direction);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn descending_is_reverse_of_ascending_for_unique_titles() {
        let items = sample();
        let mut asc = apply_sort(items.iter().collect::<Vec<_>>(), SortDirection::Ascending);
        let desc = apply_sort(items.iter().collect::<Vec<_>>(), SortDirection::Descending);
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn sort_is_stable_for_equal_titles() {
        let items = vec![
            item("Same", &["first"]),
            item("Other", &[]),
            item("Same", &["second"]),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = apply_sort(items.iter().collect(), direction);
            let same: Vec<_> = sorted
                .iter()
                .filter(|i| i.title == "Same")
                .map(|i| i.tags[0].as_str())
                .collect();
            assert_eq!(same, vec!["first", "second"]);
        }
    }

    #[test]
    fn view_filters_then_sorts() {
        let items = sample();
        let visible = view(&items, "design", SortDirection::Descending);
        assert_eq!(titles(&visible), vec!["Zebra", "banana"]);
        let visible = view(&items, "design", SortDirection::Ascending);
        assert_eq!(titles(&visible), vec!["banana", "Zebra"]);
    }

    #[test]
    fn direction_parses_from_query_values() {
        let asc: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        let desc: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(asc, SortDirection::Ascending);
        assert_eq!(desc, SortDirection::Descending);
        assert_eq!(SortDirection::default().as_str(), "asc");
    }
}
