//! File-backed content source.
//!
//! Serves content from a JSON file in the delivery API's own collection
//! shape, so the site can run without network access and tests can run
//! against known content. Queries go through the same normalizer as live
//! responses.

use std::path::Path;

use async_trait::async_trait;

use crate::model::{AssetIndex, MediaAsset};
use crate::normalize::{RawCollection, normalize_entry};
use crate::query::{ContentError, ContentQuery, ContentSource, QueryPage};

/// In-process [`ContentSource`] over a fixed collection.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    collection: RawCollection,
}

impl FixtureSource {
    /// Load a fixture from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let source = Self::from_json(&text)?;
        tracing::info!(
            path = %path.display(),
            entries = source.collection.items.len(),
            assets = source.collection.includes.assets.len(),
            "content fixture loaded"
        );
        Ok(source)
    }

    /// Parse a fixture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let collection: RawCollection = serde_json::from_str(json)?;
        Ok(Self { collection })
    }
}

#[async_trait]
impl ContentSource for FixtureSource {
    async fn query(&self, query: &ContentQuery) -> Result<QueryPage, ContentError> {
        let type_id = query.content_type.id();
        let matching: Vec<_> = self
            .collection
            .items
            .iter()
            .filter(|entry| entry.content_type_id() == Some(type_id))
            .filter(|entry| match &query.slug {
                Some(slug) => entry.slug() == Some(slug.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);

        // Links stay unresolved when the query asks for no includes.
        let assets: AssetIndex = if query.include > 0 {
            self.collection
                .includes
                .assets
                .iter()
                .cloned()
                .map(MediaAsset::from)
                .collect()
        } else {
            AssetIndex::new()
        };

        let entries = matching
            .into_iter()
            .skip(query.skip as usize)
            .take(limit)
            .filter_map(|raw| normalize_entry(raw.clone(), query.content_type, &assets))
            .collect();

        Ok(QueryPage { entries, total })
    }
}
