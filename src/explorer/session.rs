//! Explorer session and builder

use super::fingerprint::{self, Source};
use crate::config::LotsiftConfig;
use crate::filters::{self, ConditionFlag, FilterState, PriceBand, SortOrder};
use crate::selection::{SelectionState, ViewMode};
use crate::stats::{self, DEFAULT_CURRENCY, Statistics};
use crate::summary::{self, ActiveFilter, ActiveFilterEntry};
use crate::taxonomy::{TagExtractor, TagIndex, Taxonomy};
use crate::{Item, LotsiftError};
use moka::sync::Cache;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

const DEFAULT_CACHE_CAPACITY: u64 = 64;
const DEFAULT_TAG_CAPACITY: u64 = 100_000;

/// Filtered list together with how much of the source it covers
#[derive(Clone)]
struct FilteredSnapshot {
    source_len: usize,
    items: Arc<Vec<Item>>,
}

/// Stateful exploration of one result list
///
/// Construct with [`Explorer::builder`]. All mutation goes through named
/// operations; every derived value reflects the state after the last one.
pub struct Explorer {
    items: Arc<Vec<Item>>,
    ids: HashSet<String>,
    generation: u64,
    tags: TagIndex,
    filter: FilterState,
    selection: SelectionState,
    sort: SortOrder,
    currency: String,
    filtered: Cache<u64, FilteredSnapshot>,
    views: Cache<u64, Arc<Vec<Item>>>,
    stats: Cache<u64, Option<Arc<Statistics>>>,
}

impl Explorer {
    /// Create a new builder for constructing an `Explorer`
    #[must_use]
    pub fn builder() -> ExplorerBuilder {
        ExplorerBuilder::new()
    }

    /// Explorer configured from the application config
    ///
    /// # Errors
    ///
    /// Returns `LotsiftError::TaxonomyError` if the configured taxonomy file
    /// cannot be loaded.
    pub fn from_config(config: &LotsiftConfig) -> Result<Self, LotsiftError> {
        let taxonomy = Taxonomy::load_or_default(config.taxonomy_path.as_deref())?;
        Ok(Self::builder()
            .taxonomy(taxonomy)
            .currency(config.currency_symbol.clone())
            .sort(config.default_sort)
            .cache_capacity(config.cache_capacity)
            .build())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// The raw result list, in fetch order
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Append a newly fetched page
    ///
    /// Ids already present are skipped. Returns how many items were added.
    pub fn append(&mut self, page: impl IntoIterator<Item = Item>) -> usize {
        let fresh: Vec<Item> = page
            .into_iter()
            .filter(|item| self.ids.insert(item.id.clone()))
            .collect();
        if fresh.is_empty() {
            return 0;
        }
        self.tags.warm(&fresh);
        let added = fresh.len();
        Arc::make_mut(&mut self.items).extend(fresh);
        tracing::debug!(added, total = self.items.len(), "appended page");
        added
    }

    /// Start over with a new result list
    ///
    /// Selection survives only for ids present in the new list.
    pub fn replace(&mut self, items: impl IntoIterator<Item = Item>) {
        self.generation += 1;
        self.items = Arc::new(Vec::new());
        self.ids.clear();
        self.tags.clear();
        self.filtered.invalidate_all();
        self.views.invalidate_all();
        self.stats.invalidate_all();
        self.append(items);
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let ids = &self.ids;
        let removed = self.selection.retain(|id| ids.contains(id));
        if removed > 0 {
            tracing::debug!(removed, "dropped selection for vanished items");
        }
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    fn source(&self) -> Source {
        Source {
            generation: self.generation,
            len: self.items.len(),
        }
    }

    /// Filtered list in input order
    fn filtered(&self) -> Arc<Vec<Item>> {
        if !filters::is_active(&self.filter, &self.selection) {
            return Arc::clone(&self.items);
        }

        let key = fingerprint::filtered(self.generation, &self.filter, &self.selection);
        let total = self.items.len();
        let snapshot = match self.filtered.get(&key) {
            Some(hit) if hit.source_len == total => return hit.items,
            Some(prefix) => {
                let tail = filters::apply(
                    &self.items[prefix.source_len..],
                    &self.filter,
                    &self.selection,
                    &self.tags,
                );
                tracing::debug!(
                    reused = prefix.items.len(),
                    added = tail.len(),
                    "extended filtered snapshot"
                );
                let mut merged = Vec::with_capacity(prefix.items.len() + tail.len());
                merged.extend_from_slice(&prefix.items);
                merged.extend_from_slice(&tail);
                merged
            }
            None => {
                tracing::debug!(items = total, "filtered cache miss");
                filters::apply(&self.items, &self.filter, &self.selection, &self.tags).into_owned()
            }
        };

        let items = Arc::new(snapshot);
        self.filtered.insert(
            key,
            FilteredSnapshot {
                source_len: total,
                items: Arc::clone(&items),
            },
        );
        items
    }

    /// The filtered and sorted list the user is looking at
    #[must_use]
    pub fn view(&self) -> Arc<Vec<Item>> {
        if self.sort == SortOrder::None {
            return self.filtered();
        }

        let key = fingerprint::view(self.source(), &self.filter, &self.selection, self.sort);
        if let Some(hit) = self.views.get(&key) {
            return hit;
        }
        let filtered = self.filtered();
        let sorted = Arc::new(filters::sort_items(Cow::Borrowed(filtered.as_slice()), self.sort).into_owned());
        self.views.insert(key, Arc::clone(&sorted));
        sorted
    }

    /// Statistics of the whole result list
    #[must_use]
    pub fn baseline_stats(&self) -> Option<Arc<Statistics>> {
        let key = fingerprint::baseline_stats(self.source());
        self.stats.get_with(key, || {
            stats::summarize_with(&self.items, &self.currency).map(Arc::new)
        })
    }

    /// Statistics of the filtered subset
    #[must_use]
    pub fn filtered_stats(&self) -> Option<Arc<Statistics>> {
        if !filters::is_active(&self.filter, &self.selection) {
            return self.baseline_stats();
        }
        let key = fingerprint::filtered_stats(self.source(), &self.filter, &self.selection);
        self.stats.get_with(key, || {
            stats::summarize_with(&self.filtered(), &self.currency).map(Arc::new)
        })
    }

    /// Badges for every active condition
    #[must_use]
    pub fn active_filters(&self) -> Vec<ActiveFilterEntry> {
        summary::summarize_labelled(
            &self.filter,
            &self.selection,
            self.tags.extractor().taxonomy(),
        )
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        self.tags.extractor().taxonomy()
    }

    #[must_use]
    pub const fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    // ------------------------------------------------------------------
    // Filter mutations
    // ------------------------------------------------------------------

    pub fn add_include_keyword(&mut self, keyword: &str) -> bool {
        self.filter.add_include_keyword(keyword)
    }

    pub fn remove_include_keyword(&mut self, keyword: &str) -> bool {
        self.filter.remove_include_keyword(keyword)
    }

    pub fn add_exclude_keyword(&mut self, keyword: &str) -> bool {
        self.filter.add_exclude_keyword(keyword)
    }

    pub fn remove_exclude_keyword(&mut self, keyword: &str) -> bool {
        self.filter.remove_exclude_keyword(keyword)
    }

    pub const fn toggle_flag(&mut self, flag: ConditionFlag) -> bool {
        self.filter.toggle_flag(flag)
    }

    pub fn toggle_tag(&mut self, keyword: &str) -> bool {
        self.filter.toggle_tag(keyword)
    }

    pub fn toggle_band(&mut self, band: PriceBand) -> bool {
        self.filter.toggle_band(band)
    }

    /// Reset every filter dimension; the selection is left alone
    pub fn clear_filters(&mut self) {
        self.filter.clear_all();
    }

    /// Remove the condition behind one badge
    pub fn dismiss(&mut self, entry: &ActiveFilterEntry) -> bool {
        match entry.filter {
            ActiveFilter::ShowSelectedOnly => {
                let was_on = self.selection.view_mode() == ViewMode::ShowSelectedOnly;
                self.selection.set_view_mode(ViewMode::Normal);
                was_on
            }
            ref other => self.filter.dismiss(other),
        }
    }

    pub const fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    // ------------------------------------------------------------------
    // Selection mutations
    // ------------------------------------------------------------------

    /// Toggle one item of the current view
    ///
    /// Ids outside the view are ignored unless they are already selected, so
    /// a stale id can be deselected but never added. Returns true if `id` is
    /// selected afterwards.
    pub fn toggle_item(&mut self, id: &str) -> bool {
        if !self.selection.is_selected(id) && !self.in_view(id) {
            tracing::debug!(id, "toggle outside view, ignored");
            return false;
        }
        self.selection.toggle(id)
    }

    fn in_view(&self, id: &str) -> bool {
        self.view().iter().any(|item| item.id == id)
    }

    /// Range-select from the anchor to `id` within the current view
    pub fn range_select(&mut self, id: &str) -> usize {
        let view = self.view();
        self.selection.range_select(id, &view)
    }

    /// A click on an item, with `extend` for shift-click
    ///
    /// Clicks on ids outside the current view do nothing. Shift-click extends
    /// from the anchor, and is a plain toggle when there is no anchor yet.
    pub fn click(&mut self, id: &str, extend: bool) {
        let view = self.view();
        if !view.iter().any(|item| item.id == id) {
            tracing::debug!(id, extend, "click outside view, ignored");
            return;
        }
        if extend && !self.selection.is_empty() && self.selection.anchor().is_some() {
            self.selection.range_select(id, &view);
            return;
        }
        self.selection.toggle(id);
    }

    /// Select everything in the current view, or clear if it is all selected
    pub fn select_all(&mut self) {
        let view = self.view();
        self.selection.select_all(&view);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> ViewMode {
        self.selection.set_view_mode(mode)
    }

    /// Selected items in current view order
    #[must_use]
    pub fn selected_items(&self) -> Vec<Item> {
        let view = self.view();
        self.selection.selected_in(&view).into_iter().cloned().collect()
    }
}

/// Builder for `Explorer`
pub struct ExplorerBuilder {
    taxonomy: Option<Taxonomy>,
    items: Vec<Item>,
    currency: Option<String>,
    sort: SortOrder,
    cache_capacity: u64,
}

impl ExplorerBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            taxonomy: None,
            items: Vec::new(),
            currency: None,
            sort: SortOrder::None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Set the tag taxonomy (default: built-in taxonomy)
    #[must_use]
    pub fn taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    /// Set the initial result list
    #[must_use]
    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Set the currency symbol used in labels
    #[must_use]
    pub fn currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency = Some(symbol.into());
        self
    }

    /// Set the initial sort order
    #[must_use]
    pub const fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Set how many derived views each cache keeps
    #[must_use]
    pub const fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Build the `Explorer`
    #[must_use]
    pub fn build(self) -> Explorer {
        let extractor = TagExtractor::new(self.taxonomy.unwrap_or_default());
        let mut explorer = Explorer {
            items: Arc::new(Vec::new()),
            ids: HashSet::new(),
            generation: 0,
            tags: TagIndex::new(extractor, DEFAULT_TAG_CAPACITY),
            filter: FilterState::new(),
            selection: SelectionState::new(),
            sort: self.sort,
            currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            filtered: Cache::builder().max_capacity(self.cache_capacity).build(),
            views: Cache::builder().max_capacity(self.cache_capacity).build(),
            stats: Cache::builder().max_capacity(self.cache_capacity).build(),
        };
        explorer.append(self.items);
        explorer
    }
}

impl Default for ExplorerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
