//! Detail page for a single article, project or experience entry.

use maud::{Markup, html};

use super::components::{PageMeta, display_title, page_shell, responsive_image, tag_list, truncate};
use super::rich_text;
use crate::config::Config;
use crate::model::{ContentEntry, ContentType};

/// Render an entry page.
pub fn render(config: &Config, entry: &ContentEntry) -> Markup {
    let title = display_title(entry);
    let description = describe(config, entry);
    let path = entry.path();
    let og_type = match entry.content_type {
        ContentType::Article => "article",
        ContentType::Project | ContentType::Experience => "website",
    };

    let meta = PageMeta {
        title,
        description: &description,
        path: &path,
        og_type,
        image: entry.image.as_ref().and_then(|i| i.https_url()),
    };

    let body = html! {
        article class="entry" {
            div class="entry-kind" { (entry.content_type.label()) }
            h1 class="entry-title" { (title) }
            (tag_list(&entry.tags))
            @if let Some(image) = &entry.image {
                (responsive_image(image, "lead-image", false))
            }
            @if let Some(body) = &entry.body {
                div class="rich-text" {
                    (rich_text::render(body, &entry.assets))
                }
            }
        }
    };

    page_shell(config, &meta, body)
}

/// Meta description: the excerpt, else the start of the body text.
fn describe(config: &Config, entry: &ContentEntry) -> String {
    if let Some(excerpt) = entry.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        return truncate(excerpt.trim(), 200);
    }

    let text = entry
        .body
        .as_ref()
        .map(|b| b.plain_text())
        .unwrap_or_default();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        format!("{} by {}", entry.content_type.label(), config.owner_name)
    } else {
        truncate(&text, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetIndex, MediaAsset};
    use crate::render::test_config;

    fn article() -> ContentEntry {
        let body = serde_json::from_str(
            r#"{"nodeType":"document","content":[
                {"nodeType":"paragraph","content":[{"nodeType":"text","value":"First paragraph."}]},
                {"nodeType":"embedded-asset-block","data":{"target":{"sys":{"id":"fig"}}}}
            ]}"#,
        )
        .unwrap();

        ContentEntry {
            id: "a1".to_string(),
            content_type: ContentType::Article,
            slug: "hello".to_string(),
            title: "Hello <World>".to_string(),
            excerpt: None,
            body: Some(body),
            image: Some(MediaAsset {
                id: "hero".to_string(),
                title: Some("Hero".to_string()),
                url: Some("//cdn.example.com/hero.jpg".to_string()),
                width: Some(1200),
                height: Some(630),
                ..Default::default()
            }),
            tags: vec!["rust".to_string()],
            updated_at: None,
            assets: [MediaAsset {
                id: "fig".to_string(),
                url: Some("//cdn.example.com/fig.png".to_string()),
                ..Default::default()
            }]
            .into_iter()
            .collect::<AssetIndex>(),
        }
    }

    #[test]
    fn renders_title_tags_image_and_body() {
        let html = render(&test_config(), &article()).into_string();
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("<li>rust</li>"));
        assert!(html.contains(r#"src="https://cdn.example.com/hero.jpg""#));
        assert!(html.contains(r#"width="1200""#));
        assert!(html.contains("<p>First paragraph.</p>"));
        assert!(html.contains(r#"src="https://cdn.example.com/fig.png""#));
    }

    #[test]
    fn head_has_canonical_and_og() {
        let html = render(&test_config(), &article()).into_string();
        assert!(html.contains(r#"href="https://folio.test/articles/hello""#));
        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(html.contains(r#"property="og:image" content="https://cdn.example.com/hero.jpg""#));
    }

    #[test]
    fn description_falls_back_to_body_text() {
        let entry = article();
        assert_eq!(describe(&test_config(), &entry), "First paragraph.");
    }

    #[test]
    fn entry_without_body_or_image_still_renders() {
        let mut entry = article();
        entry.body = None;
        entry.image = None;
        entry.tags.clear();
        let html = render(&test_config(), &entry).into_string();
        assert!(html.contains("entry-title"));
        assert!(!html.contains("class=\"tags\""));
        assert!(html.contains("Article by Test Owner"));
    }
}
