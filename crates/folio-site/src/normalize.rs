//! Raw backend records and their normalization into [`ContentEntry`].
//!
//! The content backend returns entries as loosely-typed field maps with
//! links to assets listed separately under `includes`. Normalization picks
//! the canonical fields for each content type, resolves asset links, and
//! absorbs malformed or partial data: a bad field becomes `None` (logged),
//! never an error for the whole page.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::{AssetIndex, ContentEntry, ContentType, Document, MediaAsset, MediaResolver};

/// A collection response: `{ "items": [...], "includes": {...}, "total": N }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollection {
    #[serde(default)]
    pub items: Vec<RawEntry>,
    #[serde(default)]
    pub includes: RawIncludes,
    #[serde(default)]
    pub total: u64,
}

/// Linked records shipped with a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncludes {
    #[serde(default, rename = "Asset")]
    pub assets: Vec<RawAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub sys: RawSys,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSys {
    pub id: String,
    #[serde(default)]
    pub content_type: Option<RawTypeLink>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawEntry {
    /// Content type id from `sys.contentType.sys.id`, if present.
    pub fn content_type_id(&self) -> Option<&str> {
        self.sys
            .content_type
            .as_ref()
            .map(|link| link.sys.id.as_str())
    }

    /// The `slug` field as a string, if present.
    pub fn slug(&self) -> Option<&str> {
        self.fields.get("slug").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeLink {
    pub sys: RawTypeLinkSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeLinkSys {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    pub sys: RawSys,
    #[serde(default)]
    pub fields: RawAssetFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAssetFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file: Option<RawFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub details: Option<RawFileDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFileDetails {
    #[serde(default)]
    pub image: Option<RawImageDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImageDetails {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl From<RawAsset> for MediaAsset {
    fn from(raw: RawAsset) -> Self {
        let file = raw.fields.file.unwrap_or_default();
        let image = file.details.and_then(|d| d.image).unwrap_or_default();
        MediaAsset {
            id: raw.sys.id,
            title: raw.fields.title,
            description: raw.fields.description,
            url: file.url,
            content_type: file.content_type,
            width: image.width,
            height: image.height,
        }
    }
}

/// Normalize every entry of a collection.
///
/// Entries without a slug cannot be routed and are dropped.
pub fn normalize_collection(raw: RawCollection, content_type: ContentType) -> Vec<ContentEntry> {
    let assets: AssetIndex = raw.includes.assets.into_iter().map(MediaAsset::from).collect();

    raw.items
        .into_iter()
        .filter_map(|entry| normalize_entry(entry, content_type, &assets))
        .collect()
}

/// Normalize one entry against the assets included with its response.
pub fn normalize_entry(
    raw: RawEntry,
    content_type: ContentType,
    assets: &AssetIndex,
) -> Option<ContentEntry> {
    let id = raw.sys.id;
    let fields = raw.fields;

    let Some(slug) = text_field(&fields, "slug").filter(|s| !s.is_empty()) else {
        tracing::warn!(entry_id = %id, content_type = %content_type, "entry has no slug, skipping");
        return None;
    };

    let title = text_field(&fields, "title").unwrap_or_default();
    let excerpt = text_field(&fields, "excerpt").filter(|s| !s.is_empty());
    let tags = tags_field(&fields, &id);
    let body = body_field(&fields, content_type.body_field(), &id);
    let image = fields
        .get(content_type.image_field())
        .and_then(link_id)
        .and_then(|asset_id| {
            let resolved = assets.resolve_asset(asset_id).cloned();
            if resolved.is_none() {
                tracing::debug!(entry_id = %id, asset_id, "unresolvable image link dropped");
            }
            resolved
        });

    Some(ContentEntry {
        id,
        content_type,
        slug,
        title,
        excerpt,
        body,
        image,
        tags,
        updated_at: raw.sys.updated_at,
        assets: assets.clone(),
    })
}

fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}

fn tags_field(fields: &Map<String, Value>, entry_id: &str) -> Vec<String> {
    match fields.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(other) => {
            tracing::warn!(entry_id, value = %other, "tags field is not a list, ignoring");
            Vec::new()
        }
    }
}

fn body_field(fields: &Map<String, Value>, name: &str, entry_id: &str) -> Option<Document> {
    let value = fields.get(name)?;
    match serde_json::from_value::<Document>(value.clone()) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(entry_id, field = name, error = %e, "malformed rich-text body, ignoring");
            None
        }
    }
}

/// Id of a link object (`{"sys": {"type": "Link", "id": "..."}}`).
fn link_id(value: &Value) -> Option<&str> {
    value.get("sys")?.get("id")?.as_str()
}
