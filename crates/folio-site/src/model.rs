//! Canonical content model.
//!
//! Every content type served by the site is normalized into one
//! [`ContentEntry`] shape. Field names differ per type in the backend
//! (projects call their body `description` and their image `thumbnail`);
//! [`ContentType`] owns that mapping so nothing downstream has to care.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content types the site knows how to route and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Project,
    Experience,
}

impl ContentType {
    /// All routable content types, in home page order.
    pub const ALL: [ContentType; 3] = [Self::Experience, Self::Article, Self::Project];

    /// Content type id in the backend.
    pub fn id(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Project => "project",
            Self::Experience => "experience",
        }
    }

    /// First path segment of this type's detail pages.
    pub fn route_prefix(self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Project => "projects",
            Self::Experience => "experience",
        }
    }

    /// Site-relative path of the detail page for `slug`.
    pub fn path_for(self, slug: &str) -> String {
        format!("/{}/{}", self.route_prefix(), slug)
    }

    /// Backend field holding the rich-text body.
    pub fn body_field(self) -> &'static str {
        match self {
            Self::Project => "description",
            Self::Article | Self::Experience => "body",
        }
    }

    /// Backend field holding the asset link for the lead image.
    pub fn image_field(self) -> &'static str {
        match self {
            Self::Project => "thumbnail",
            Self::Article | Self::Experience => "featuredImage",
        }
    }

    /// Fields projected for the home page listing of this type.
    pub fn summary_fields(self) -> &'static [&'static str] {
        match self {
            Self::Article => &[
                "sys.id",
                "fields.title",
                "fields.slug",
                "fields.excerpt",
                "fields.tags",
            ],
            Self::Project => &[
                "sys.id",
                "fields.title",
                "fields.slug",
                "fields.thumbnail",
                "fields.tags",
            ],
            Self::Experience => &["sys.id", "fields.title", "fields.slug"],
        }
    }

    /// Human label used in page chrome.
    pub fn label(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Project => "Project",
            Self::Experience => "Experience",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(Self::Article),
            "project" => Ok(Self::Project),
            "experience" => Ok(Self::Experience),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

/// A reference to an image hosted by the content backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Backend asset id.
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// File URL as delivered by the backend, usually scheme-relative (`//host/path`).
    pub url: Option<String>,
    /// MIME type of the file.
    pub content_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl MediaAsset {
    /// Absolute HTTPS URL for the file, if it has a usable one.
    pub fn https_url(&self) -> Option<String> {
        let url = self.url.as_deref()?.trim();
        if let Some(rest) = url.strip_prefix("//") {
            if rest.is_empty() {
                return None;
            }
            Some(format!("https://{rest}"))
        } else if url.starts_with("https://") || url.starts_with("http://") {
            Some(url.to_string())
        } else {
            None
        }
    }

    /// Both dimensions, when the backend reported them.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

/// Looks up assets referenced from inside rich text.
pub trait MediaResolver {
    fn resolve_asset(&self, id: &str) -> Option<&MediaAsset>;
}

/// Assets shipped alongside a query response, keyed by asset id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetIndex {
    assets: HashMap<String, MediaAsset>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: MediaAsset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<MediaAsset> for AssetIndex {
    fn from_iter<I: IntoIterator<Item = MediaAsset>>(iter: I) -> Self {
        let mut index = Self::new();
        for asset in iter {
            index.insert(asset);
        }
        index
    }
}

impl MediaResolver for AssetIndex {
    fn resolve_asset(&self, id: &str) -> Option<&MediaAsset> {
        self.assets.get(id)
    }
}

/// A rich-text document: the root node of the tree.
pub type Document = Node;

/// One node of a rich-text tree, in the backend's JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node type tag, e.g. `paragraph`, `heading-2`, `embedded-asset-block`.
    pub node_type: String,
    #[serde(default)]
    pub content: Vec<Node>,
    /// Text value (text nodes only).
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub marks: Vec<Mark>,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}

/// Text formatting mark (`bold`, `italic`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Node payload. Only the parts the renderer uses are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Hyperlink target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Link to an embedded asset or entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Link>,
}

/// A backend link object: `{"sys": {"id": "...", "linkType": "Asset"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    pub id: String,
    #[serde(default)]
    pub link_type: Option<String>,
}

/// A content entry in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    /// Backend entry id.
    pub id: String,
    pub content_type: ContentType,
    pub slug: String,
    /// Empty when the query did not project titles.
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<Document>,
    pub image: Option<MediaAsset>,
    pub tags: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Assets included with the response, for embedded-asset lookups.
    pub assets: AssetIndex,
}

impl ContentEntry {
    /// Site-relative path of this entry's page.
    pub fn path(&self) -> String {
        self.content_type.path_for(&self.slug)
    }
}
