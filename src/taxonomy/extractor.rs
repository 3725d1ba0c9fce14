//! Title tagging by substring containment

use super::types::{Tag, Taxonomy};
use crate::Item;
use moka::sync::Cache;
use std::sync::Arc;

/// Anything that can report the tags of an item
///
/// The filter evaluator only needs this seam, so callers can hand it either
/// a plain [`TagExtractor`] or the caching [`TagIndex`].
pub trait TagSource {
    /// Tags of the item, in taxonomy order
    fn tags_for(&self, item: &Item) -> Vec<&Tag>;
}

/// Maps free-text titles to tags
///
/// Matching is case-sensitive substring containment against each tag's
/// keyword. Several tags may match, including several from one group.
#[derive(Debug, Clone, Default)]
pub struct TagExtractor {
    taxonomy: Taxonomy,
}

impl TagExtractor {
    #[must_use]
    pub const fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    #[must_use]
    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Every tag whose keyword occurs in `title`
    ///
    /// An empty title has no tags.
    #[must_use]
    pub fn tags_of(&self, title: &str) -> Vec<&Tag> {
        if title.is_empty() {
            return Vec::new();
        }
        self.taxonomy
            .tags
            .iter()
            .filter(|tag| title.contains(tag.keyword.as_str()))
            .collect()
    }

    /// Taxonomy positions of the tags matching `title`
    #[must_use]
    pub fn positions_of(&self, title: &str) -> Vec<usize> {
        if title.is_empty() {
            return Vec::new();
        }
        self.taxonomy
            .tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| title.contains(tag.keyword.as_str()))
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl TagSource for TagExtractor {
    fn tags_for(&self, item: &Item) -> Vec<&Tag> {
        self.tags_of(item.title_or_empty())
    }
}

/// Tag cache keyed by item id
///
/// Items are immutable, so an id's tags never change. Appending a page only
/// tags the new ids; the shared prefix is served from the cache.
pub struct TagIndex {
    extractor: TagExtractor,
    cache: Cache<String, Arc<[usize]>>,
}

impl TagIndex {
    /// Create a tag index holding at most `max_capacity` items
    #[must_use]
    pub fn new(extractor: TagExtractor, max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { extractor, cache }
    }

    #[must_use]
    pub const fn extractor(&self) -> &TagExtractor {
        &self.extractor
    }

    /// Tag every item not yet in the index
    ///
    /// Returns how many items had to be tagged.
    pub fn warm<'a>(&self, items: impl IntoIterator<Item = &'a Item>) -> usize {
        let mut tagged = 0;
        for item in items {
            if !self.cache.contains_key(item.id.as_str()) {
                self.positions(item);
                tagged += 1;
            }
        }
        tracing::trace!(tagged, "tag index warmed");
        tagged
    }

    /// Forget every cached item
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    fn positions(&self, item: &Item) -> Arc<[usize]> {
        if let Some(hit) = self.cache.get(item.id.as_str()) {
            return hit;
        }
        let positions: Arc<[usize]> = self.extractor.positions_of(item.title_or_empty()).into();
        self.cache.insert(item.id.clone(), Arc::clone(&positions));
        positions
    }
}

impl TagSource for TagIndex {
    fn tags_for(&self, item: &Item) -> Vec<&Tag> {
        let tags = &self.extractor.taxonomy().tags;
        self.positions(item)
            .iter()
            .filter_map(|&idx| tags.get(idx))
            .collect()
    }
}
