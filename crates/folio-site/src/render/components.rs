//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::config::Config;
use crate::model::{ContentEntry, MediaAsset};

/// Inline CSS for all pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#2563eb;--accent-hover:#1d4ed8;--surface:#fff;--border:rgba(17,17,17,.1);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}

.site-header{width:100%;border-bottom:1px solid var(--border);background:var(--surface)}
.site-header nav{max-width:960px;margin:0 auto;padding:1rem;display:flex;align-items:center;justify-content:space-between}
.site-header .brand{font-weight:700;color:var(--fg)}
.site-header .links{display:flex;gap:1.25rem}

main{max-width:960px;width:100%;margin:0 auto;padding:2rem 1rem;flex:1}
section{margin-bottom:3rem}
section>h2{font-size:1.5rem;margin-bottom:1rem;letter-spacing:-.01em}
.empty{color:var(--fg3)}

.intro h1{font-size:2.25rem;letter-spacing:-.02em}
.intro p{color:var(--fg2);font-size:1.15rem;max-width:640px}

.cards{display:grid;gap:1rem}
.cards.grid{grid-template-columns:repeat(auto-fill,minmax(260px,1fr))}
.card{display:block;padding:1.25rem;border:1px solid var(--border);border-radius:10px;background:var(--surface);color:var(--fg)}
.card:hover{border-color:var(--accent);text-decoration:none}
.card h3{font-size:1.1rem;margin-bottom:.35rem}
.card p{color:var(--fg2);font-size:.95rem}
.card .thumb{width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:6px;margin-bottom:.75rem;background:var(--border)}

.tags{display:flex;flex-wrap:wrap;gap:.35rem;margin:.5rem 0;list-style:none}
.tags li{font-size:.75rem;padding:.15rem .6rem;border-radius:100px;background:var(--bg);border:1px solid var(--border);color:var(--fg2)}

.list-controls{display:flex;gap:.5rem;align-items:center;margin-bottom:1rem;flex-wrap:wrap}
.list-controls input[type=search]{flex:1;min-width:180px;padding:.45rem .75rem;border:1px solid var(--border);border-radius:6px;font:inherit}
.list-controls button{padding:.4rem .8rem;border:1px solid var(--border);border-radius:6px;background:var(--surface);font:inherit;color:var(--fg);cursor:pointer}
.list-controls button.active{background:var(--accent);border-color:var(--accent);color:#fff}

.contact form{display:grid;gap:.75rem;max-width:560px}
.contact label{display:grid;gap:.25rem;font-weight:500}
.contact input,.contact textarea{padding:.55rem .75rem;border:1px solid var(--border);border-radius:6px;font:inherit;background:var(--surface);color:var(--fg)}
.contact textarea{min-height:140px}
.contact button{justify-self:start;padding:.55rem 1.1rem;background:var(--accent);color:#fff;border:none;border-radius:6px;font:inherit;cursor:pointer}
.contact button:disabled{opacity:.6;cursor:default}
.feedback{padding:.6rem .8rem;border-radius:6px}
.feedback.success{background:#ecfdf5;color:#065f46}
.feedback.error{background:#fef2f2;color:#991b1b}

.entry-title{font-size:2rem;line-height:1.25;letter-spacing:-.02em;margin-bottom:.5rem}
.entry-kind{font-size:.8rem;text-transform:uppercase;letter-spacing:.04em;color:var(--fg3)}
.lead-image{width:100%;height:auto;border-radius:8px;margin:1rem 0}
.rich-text{font-size:1.05rem;line-height:1.75}
.rich-text h1,.rich-text h2,.rich-text h3,.rich-text h4,.rich-text h5,.rich-text h6{font-weight:700;margin:1.5rem 0 .75rem}
.rich-text p{margin:.75rem 0}
.rich-text ul,.rich-text ol{margin:.75rem 0;padding-left:1.5rem}
.rich-text blockquote{border-left:3px solid var(--border);padding:.5rem 0 .5rem 1rem;margin:.75rem 0;color:var(--fg2)}
.rich-text code{font-family:var(--mono);font-size:.88em;background:var(--bg);padding:.15rem .35rem;border-radius:3px}
.rich-text hr{border:none;border-top:1px solid var(--border);margin:1.5rem 0}
.rich-text table{border-collapse:collapse;width:100%;margin:.75rem 0}
.rich-text th,.rich-text td{border:1px solid var(--border);padding:.4rem .75rem;text-align:left}
.rich-text figure{margin:1rem 0}
.rich-text figcaption{font-size:.85rem;color:var(--fg3)}

.site-footer{text-align:center;padding:1.5rem 1rem;font-size:.85rem;color:var(--fg3);border-top:1px solid var(--border)}

@media(prefers-color-scheme:dark){
:root{--bg:#0b0d12;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#60a5fa;--accent-hover:#93c5fd;--surface:#12151c;--border:rgba(255,255,255,.1)}
.feedback.success{background:#052e24;color:#6ee7b7}
.feedback.error{background:#3b0d0d;color:#fca5a5}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#2563eb}
@media(prefers-color-scheme:dark){
body{background:#0b0d12;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#60a5fa}
}
"#;

/// Content-Security-Policy header value.
///
/// No scripts at all. Forms may only post back to this origin; images may
/// come from any HTTPS host (the content CDN).
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: data:; form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

/// Per-page metadata for `<head>`.
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Site-relative path, e.g. `/articles/hello`.
    pub path: &'a str,
    /// OG type ("website", "article").
    pub og_type: &'a str,
    /// Absolute HTTPS image URL.
    pub image: Option<String>,
}

/// Render the full HTML page shell with `<head>`, OG tags, header and footer.
pub fn page_shell(config: &Config, meta: &PageMeta<'_>, body_content: Markup) -> Markup {
    let canonical_url = format!("{}{}", config.base_url, meta.path);
    let full_title = if meta.title.is_empty() || meta.title == config.site_name {
        config.site_name.clone()
    } else {
        format!("{} | {}", meta.title, config.site_name)
    };
    let twitter_card = if meta.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (full_title) }
                meta name="description" content=(meta.description);
                link rel="canonical" href=(canonical_url);

                meta property="og:title" content=(full_title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(config.site_name);
                meta property="og:type" content=(meta.og_type);
                @if let Some(image) = &meta.image {
                    meta property="og:image" content=(image);
                }

                meta name="twitter:card" content=(twitter_card);
                meta name="twitter:title" content=(full_title);
                meta name="twitter:description" content=(meta.description);

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (site_header(config))
                main { (body_content) }
                (site_footer(&config.owner_name))
            }
        }
    }
}

fn site_header(config: &Config) -> Markup {
    html! {
        header class="site-header" {
            nav {
                a class="brand" href="/" { (config.owner_name) }
                div class="links" {
                    a href="/" { "Home" }
                    a href="/" { "Portfolio" }
                }
            }
        }
    }
}

fn site_footer(owner_name: &str) -> Markup {
    let year = chrono::Utc::now().year();
    html! {
        footer class="site-footer" {
            "© " (year) " " (owner_name) ". All rights reserved."
        }
    }
}

/// Standalone error page. Never includes internal details.
pub fn error_page(title: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="robots" content="noindex";
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                main class="error-page" {
                    h1 { (title) }
                    p { (message) }
                    a href="/" { "Back to home" }
                }
            }
        }
    }
}

/// Tag pills. Renders nothing for an empty list.
pub fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul class="tags" {
                @for tag in tags {
                    li { (tag) }
                }
            }
        }
    }
}

/// An image with its dimensions reserved, so layout does not shift while it
/// loads. Renders nothing when the asset has no usable URL.
pub fn responsive_image(asset: &MediaAsset, class: &str, lazy: bool) -> Markup {
    let Some(src) = asset.https_url().filter(|u| is_safe_url(u)) else {
        return html! {};
    };
    let alt = asset.title.as_deref().unwrap_or_default();
    let loading = if lazy { "lazy" } else { "eager" };

    html! {
        @if let Some((width, height)) = asset.dimensions() {
            img class=(class) src=(src) alt=(alt) width=(width) height=(height) loading=(loading) decoding="async";
        } @else {
            img class=(class) src=(src) alt=(alt) loading=(loading) decoding="async";
        }
    }
}

/// A linked card for a list entry.
pub fn entry_card(entry: &ContentEntry, show_image: bool) -> Markup {
    html! {
        a class="card" href=(entry.path()) {
            @if show_image {
                @if let Some(image) = &entry.image {
                    (responsive_image(image, "thumb", true))
                }
            }
            h3 { (display_title(entry)) }
            @if let Some(excerpt) = entry.excerpt.as_deref().filter(|e| !e.is_empty()) {
                p { (truncate(excerpt, 200)) }
            }
            (tag_list(&entry.tags))
        }
    }
}

/// Entry title, falling back to the slug when the title is empty.
pub fn display_title(entry: &ContentEntry) -> &str {
    if entry.title.trim().is_empty() {
        &entry.slug
    } else {
        &entry.title
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentType;

    fn entry(title: &str) -> ContentEntry {
        ContentEntry {
            id: "1".to_string(),
            content_type: ContentType::Project,
            slug: "demo".to_string(),
            title: title.to_string(),
            excerpt: None,
            body: None,
            image: None,
            tags: vec!["Rust".to_string()],
            updated_at: None,
            assets: Default::default(),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("café", 4), "caf...");
    }

    #[test]
    fn safe_urls() {
        assert!(is_safe_url("https://example.com"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("//cdn.example.com/a.png"));
    }

    #[test]
    fn empty_tag_list_renders_nothing() {
        assert_eq!(tag_list(&[]).into_string(), "");
        assert!(tag_list(&["ux".to_string()]).into_string().contains("<li>ux</li>"));
    }

    #[test]
    fn image_reserves_dimensions() {
        let asset = MediaAsset {
            id: "a".to_string(),
            url: Some("//cdn.example.com/a.png".to_string()),
            width: Some(640),
            height: Some(480),
            ..Default::default()
        };
        let html = responsive_image(&asset, "lead-image", false).into_string();
        assert!(html.contains(r#"src="https://cdn.example.com/a.png""#));
        assert!(html.contains(r#"width="640""#));
        assert!(html.contains(r#"height="480""#));
    }

    #[test]
    fn image_without_url_renders_nothing() {
        let asset = MediaAsset::default();
        assert_eq!(responsive_image(&asset, "thumb", true).into_string(), "");
    }

    #[test]
    fn card_links_to_entry_page() {
        let html = entry_card(&entry("Demo"), true).into_string();
        assert!(html.contains(r#"href="/projects/demo""#));
        assert!(html.contains("Demo"));
    }

    #[test]
    fn card_falls_back_to_slug() {
        let html = entry_card(&entry(""), false).into_string();
        assert!(html.contains("<h3>demo</h3>"));
    }

    #[test]
    fn error_page_has_no_script() {
        let html = error_page("Not Found", "Nothing here.").into_string();
        assert!(html.contains("Not Found"));
        assert!(!html.contains("<script"));
    }
}
