//! Rich-text rendering.
//!
//! A document is a tree of typed nodes. Each node type tag maps to a render
//! function in a [`NodeRenderers`] table; tags without an entry render
//! nothing, so unknown or unsupported node types (embedded entries, entry
//! hyperlinks) drop out silently instead of failing the page.

use std::collections::HashMap;
use std::sync::LazyLock;

use maud::{Markup, html};

use crate::model::{Document, MediaResolver, Node};

/// Render function for one node type.
pub type RenderFn = fn(&Node, &RenderContext<'_>) -> Markup;

/// State threaded through one render pass.
pub struct RenderContext<'a> {
    renderers: &'a NodeRenderers,
    resolver: &'a dyn MediaResolver,
}

impl RenderContext<'_> {
    /// Render every child of `node`, in order.
    pub fn children(&self, node: &Node) -> Markup {
        html! {
            @for child in &node.content {
                (self.renderers.render_node(child, self))
            }
        }
    }

    pub fn resolver(&self) -> &dyn MediaResolver {
        self.resolver
    }
}

/// Lookup table from node type tag to render function.
#[derive(Clone)]
pub struct NodeRenderers {
    table: HashMap<&'static str, RenderFn>,
}

static STANDARD: LazyLock<NodeRenderers> = LazyLock::new(NodeRenderers::standard);

impl NodeRenderers {
    /// An empty table: every node renders nothing.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// The table used for entry bodies.
    pub fn standard() -> Self {
        Self::empty()
            .with("document", render_children)
            .with("paragraph", |n, cx| html! { p { (cx.children(n)) } })
            .with("heading-1", |n, cx| html! { h1 { (cx.children(n)) } })
            .with("heading-2", |n, cx| html! { h2 { (cx.children(n)) } })
            .with("heading-3", |n, cx| html! { h3 { (cx.children(n)) } })
            .with("heading-4", |n, cx| html! { h4 { (cx.children(n)) } })
            .with("heading-5", |n, cx| html! { h5 { (cx.children(n)) } })
            .with("heading-6", |n, cx| html! { h6 { (cx.children(n)) } })
            .with("unordered-list", |n, cx| html! { ul { (cx.children(n)) } })
            .with("ordered-list", |n, cx| html! { ol { (cx.children(n)) } })
            .with("list-item", |n, cx| html! { li { (cx.children(n)) } })
            .with("blockquote", |n, cx| html! { blockquote { (cx.children(n)) } })
            .with("hr", |_, _| html! { hr; })
            .with("table", |n, cx| html! { table { tbody { (cx.children(n)) } } })
            .with("table-row", |n, cx| html! { tr { (cx.children(n)) } })
            .with("table-cell", |n, cx| html! { td { (cx.children(n)) } })
            .with("table-header-cell", |n, cx| html! { th { (cx.children(n)) } })
            .with("text", render_text)
            .with("hyperlink", render_hyperlink)
            .with("embedded-asset-block", render_embedded_asset)
    }

    /// Set (or replace) the renderer for a node type.
    pub fn with(mut self, node_type: &'static str, render: RenderFn) -> Self {
        self.table.insert(node_type, render);
        self
    }

    /// Render a whole document.
    pub fn render(&self, document: &Document, resolver: &dyn MediaResolver) -> Markup {
        let cx = RenderContext {
            renderers: self,
            resolver,
        };
        self.render_node(document, &cx)
    }

    fn render_node(&self, node: &Node, cx: &RenderContext<'_>) -> Markup {
        match self.table.get(node.node_type.as_str()) {
            Some(render) => render(node, cx),
            None => html! {},
        }
    }
}

/// Render a document with the standard renderers.
pub fn render(document: &Document, resolver: &dyn MediaResolver) -> Markup {
    STANDARD.render(document, resolver)
}

/// Render a sequence of nodes, one fragment per node.
pub fn render_nodes(nodes: &[Node], resolver: &dyn MediaResolver) -> Vec<Markup> {
    let cx = RenderContext {
        renderers: &STANDARD,
        resolver,
    };
    nodes
        .iter()
        .map(|node| STANDARD.render_node(node, &cx))
        .collect()
}

fn render_children(node: &Node, cx: &RenderContext<'_>) -> Markup {
    cx.children(node)
}

fn render_text(node: &Node, _: &RenderContext<'_>) -> Markup {
    let value = node.value.as_deref().unwrap_or_default();
    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or_default();
    let text = html! {
        (first)
        @for line in lines {
            br;
            (line)
        }
    };

    node.marks.iter().fold(text, |inner, mark| match mark.kind.as_str() {
        "bold" => html! { strong { (inner) } },
        "italic" => html! { em { (inner) } },
        "underline" => html! { u { (inner) } },
        "code" => html! { code { (inner) } },
        "superscript" => html! { sup { (inner) } },
        "subscript" => html! { sub { (inner) } },
        "strikethrough" => html! { s { (inner) } },
        _ => inner,
    })
}

fn render_hyperlink(node: &Node, cx: &RenderContext<'_>) -> Markup {
    match node.data.uri.as_deref().filter(|uri| is_linkable(uri)) {
        Some(uri) => html! {
            a href=(uri) rel="noopener noreferrer" { (cx.children(node)) }
        },
        None => cx.children(node),
    }
}

fn is_linkable(uri: &str) -> bool {
    uri.starts_with("https://") || uri.starts_with("http://") || uri.starts_with("mailto:")
}

/// An embedded image. Missing asset, missing file or an unusable URL all
/// render nothing.
fn render_embedded_asset(node: &Node, cx: &RenderContext<'_>) -> Markup {
    let Some(target) = &node.data.target else {
        return html! {};
    };
    let Some(asset) = cx.resolver().resolve_asset(&target.sys.id) else {
        tracing::debug!(asset_id = %target.sys.id, "embedded asset not included, skipping");
        return html! {};
    };
    let Some(src) = asset.https_url() else {
        return html! {};
    };

    let alt = asset.title.as_deref().unwrap_or_default();
    html! {
        figure class="embedded-asset" {
            @if let Some((width, height)) = asset.dimensions() {
                img src=(src) alt=(alt) width=(width) height=(height) loading="lazy";
            } @else {
                img src=(src) alt=(alt) loading="lazy";
            }
            @if let Some(caption) = asset.description.as_deref().filter(|d| !d.is_empty()) {
                figcaption { (caption) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetIndex, MediaAsset};

    fn doc(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    fn assets() -> AssetIndex {
        [
            MediaAsset {
                id: "img1".to_string(),
                title: Some("Diagram".to_string()),
                url: Some("//images.example.net/diagram.png".to_string()),
                width: Some(800),
                height: Some(600),
                ..Default::default()
            },
            MediaAsset {
                id: "nofile".to_string(),
                title: Some("Broken".to_string()),
                ..Default::default()
            },
        ]
        .into_iter()
        .collect()
    }

    fn render_str(json: &str) -> String {
        render(&doc(json), &assets()).into_string()
    }

    #[test]
    fn paragraph_and_heading() {
        let html = render_str(
            r#"{"nodeType":"document","content":[
                {"nodeType":"heading-2","content":[{"nodeType":"text","value":"Intro","marks":[]}]},
                {"nodeType":"paragraph","content":[{"nodeType":"text","value":"Hello","marks":[]}]}
            ]}"#,
        );
        assert_eq!(html, "<h2>Intro</h2><p>Hello</p>");
    }

    #[test]
    fn marks_nest() {
        let html = render_str(
            r#"{"nodeType":"text","value":"x","marks":[{"type":"bold"},{"type":"italic"}]}"#,
        );
        assert_eq!(html, "<em><strong>x</strong></em>");
    }

    #[test]
    fn text_is_escaped() {
        let html = render_str(r#"{"nodeType":"text","value":"<script>","marks":[]}"#);
        assert_eq!(html, "&lt;script&gt;");
    }

    #[test]
    fn newlines_become_breaks() {
        let html = render_str(r#"{"nodeType":"text","value":"a\nb","marks":[]}"#);
        assert_eq!(html, "a<br>b");
    }

    #[test]
    fn lists() {
        let html = render_str(
            r#"{"nodeType":"unordered-list","content":[
                {"nodeType":"list-item","content":[{"nodeType":"text","value":"one"}]},
                {"nodeType":"list-item","content":[{"nodeType":"text","value":"two"}]}
            ]}"#,
        );
        assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn hyperlink_only_for_safe_schemes() {
        let safe = render_str(
            r#"{"nodeType":"hyperlink","data":{"uri":"https://example.com"},
                "content":[{"nodeType":"text","value":"site"}]}"#,
        );
        assert!(safe.contains(r#"href="https://example.com""#));

        let unsafe_link = render_str(
            r#"{"nodeType":"hyperlink","data":{"uri":"javascript:alert(1)"},
                "content":[{"nodeType":"text","value":"site"}]}"#,
        );
        assert_eq!(unsafe_link, "site");
    }

    #[test]
    fn embedded_asset_renders_image() {
        let html = render_str(
            r#"{"nodeType":"embedded-asset-block","data":{"target":{"sys":{"id":"img1","linkType":"Asset"}}}}"#,
        );
        assert!(html.contains(r#"src="https://images.example.net/diagram.png""#));
        assert!(html.contains(r#"alt="Diagram""#));
        assert!(html.contains(r#"width="800""#));
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn embedded_asset_without_file_renders_nothing() {
        let html = render_str(
            r#"{"nodeType":"embedded-asset-block","data":{"target":{"sys":{"id":"nofile"}}}}"#,
        );
        assert_eq!(html, "");
    }

    #[test]
    fn embedded_asset_not_included_renders_nothing() {
        let html = render_str(
            r#"{"nodeType":"embedded-asset-block","data":{"target":{"sys":{"id":"ghost"}}}}"#,
        );
        assert_eq!(html, "");
    }

    #[test]
    fn unknown_node_types_render_nothing() {
        let html = render_str(
            r#"{"nodeType":"document","content":[
                {"nodeType":"embedded-entry-block","data":{"target":{"sys":{"id":"e1"}}}},
                {"nodeType":"paragraph","content":[{"nodeType":"text","value":"kept"}]}
            ]}"#,
        );
        assert_eq!(html, "<p>kept</p>");
    }

    #[test]
    fn table_renders() {
        let html = render_str(
            r#"{"nodeType":"table","content":[{"nodeType":"table-row","content":[
                {"nodeType":"table-header-cell","content":[{"nodeType":"text","value":"h"}]},
                {"nodeType":"table-cell","content":[{"nodeType":"text","value":"c"}]}
            ]}]}"#,
        );
        assert_eq!(html, "<table><tbody><tr><th>h</th><td>c</td></tr></tbody></table>");
    }

    #[test]
    fn override_replaces_renderer() {
        let renderers = NodeRenderers::standard().with("hr", |_, _| html! { div class="rule" {} });
        let html = renderers
            .render(&doc(r#"{"nodeType":"hr"}"#), &AssetIndex::new())
            .into_string();
        assert_eq!(html, r#"<div class="rule"></div>"#);
    }

    #[test]
    fn render_nodes_yields_one_fragment_per_node() {
        let nodes: Vec<Node> = serde_json::from_str(
            r#"[{"nodeType":"hr"},{"nodeType":"text","value":"t"},{"nodeType":"bogus"}]"#,
        )
        .unwrap();
        let fragments = render_nodes(&nodes, &AssetIndex::new());
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].clone().into_string(), "<hr>");
        assert_eq!(fragments[2].clone().into_string(), "");
    }
}
