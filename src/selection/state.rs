//! Selection state and anchor-based range selection

use crate::Item;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the selection restricts the view list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Selection does not affect the view
    #[default]
    Normal,
    /// Only selected items are shown
    ShowSelectedOnly,
    /// Selected items are hidden
    HideSelected,
}

/// Selected item ids plus the range anchor and view mode
///
/// The view mode falls back to `Normal` whenever the selection becomes
/// empty, so a restricting mode always has something to restrict by.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<String>,
    anchor: Option<String>,
    view_mode: ViewMode,
    revision: u64,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub const fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Last individually acted-upon id
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Counter bumped by every mutation
    ///
    /// Two states with the same revision from the same lineage are equal,
    /// which makes the revision a cheap cache key.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Selected ids in the order they appear in `ordered`
    #[must_use]
    pub fn selected_in<'a>(&self, ordered: &'a [Item]) -> Vec<&'a Item> {
        ordered.iter().filter(|item| self.is_selected(&item.id)).collect()
    }

    /// Flip one id and make it the anchor. Returns true if now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_selected = if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        };
        self.anchor = Some(id.to_string());
        self.settle();
        now_selected
    }

    /// Add every item between the anchor and `id` in `ordered`, inclusive
    ///
    /// Only ever adds. Does nothing when the selection is empty, there is no
    /// anchor, or either id is missing from `ordered`. On success `id`
    /// becomes the new anchor. Returns how many ids were newly added.
    pub fn range_select(&mut self, id: &str, ordered: &[Item]) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let Some(anchor) = self.anchor.as_deref() else {
            return 0;
        };
        let anchor_pos = ordered.iter().position(|item| item.id == anchor);
        let target_pos = ordered.iter().position(|item| item.id == id);
        let (Some(anchor_pos), Some(target_pos)) = (anchor_pos, target_pos) else {
            tracing::debug!(id, anchor, "range select outside view, ignored");
            return 0;
        };

        let (start, end) = (anchor_pos.min(target_pos), anchor_pos.max(target_pos));
        let added = ordered[start..=end]
            .iter()
            .filter(|item| self.selected.insert(item.id.clone()))
            .count();
        self.anchor = Some(id.to_string());
        self.settle();
        added
    }

    /// Select exactly `ordered`, or clear everything if it is all selected
    ///
    /// Selecting replaces the previous selection. Clearing drops the whole
    /// selection, including ids outside `ordered`. An empty list is ignored.
    pub fn select_all(&mut self, ordered: &[Item]) {
        if ordered.is_empty() {
            return;
        }
        if ordered.iter().all(|item| self.is_selected(&item.id)) {
            self.clear();
            return;
        }
        self.selected = ordered.iter().map(|item| item.id.clone()).collect();
        if self.anchor.as_deref().is_some_and(|a| !self.selected.contains(a)) {
            self.anchor = None;
        }
        self.settle();
    }

    /// Drop the selection and anchor, back to `Normal` view
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.view_mode = ViewMode::Normal;
        self.revision += 1;
    }

    /// Switch view mode
    ///
    /// Restricting modes need a selection; with nothing selected the mode
    /// stays `Normal`. Returns the mode in effect afterwards.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> ViewMode {
        if mode != ViewMode::Normal && self.selected.is_empty() {
            return self.view_mode;
        }
        self.view_mode = mode;
        self.revision += 1;
        self.view_mode
    }

    /// Turn `mode` on, or back to `Normal` if it is already on
    pub fn toggle_view_mode(&mut self, mode: ViewMode) -> ViewMode {
        if self.view_mode == mode {
            self.set_view_mode(ViewMode::Normal)
        } else {
            self.set_view_mode(mode)
        }
    }

    /// Keep only ids for which `keep` returns true
    ///
    /// The anchor is dropped if its id goes. Returns how many ids were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        let removed = before - self.selected.len();
        if removed == 0 {
            return 0;
        }
        if self.anchor.as_deref().is_some_and(|a| !self.selected.contains(a)) {
            self.anchor = None;
        }
        self.settle();
        removed
    }

    /// Whether `item` survives the current view mode
    #[must_use]
    pub fn admits(&self, item: &Item) -> bool {
        match self.view_mode {
            ViewMode::Normal => true,
            ViewMode::ShowSelectedOnly => self.is_selected(&item.id),
            ViewMode::HideSelected => !self.is_selected(&item.id),
        }
    }

    fn settle(&mut self) {
        if self.selected.is_empty() {
            self.view_mode = ViewMode::Normal;
        }
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::new(format!("item{i}"), format!("Item {i}"), 100 * i as u64))
            .collect()
    }

    fn ids(state: &SelectionState) -> Vec<String> {
        let mut ids: Vec<String> = state.selected().iter().cloned().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_toggle_sets_anchor() {
        let mut state = SelectionState::new();
        assert!(state.toggle("item1"));
        assert!(state.is_selected("item1"));
        assert_eq!(state.anchor(), Some("item1"));

        assert!(!state.toggle("item1"));
        assert!(state.is_empty());
        assert_eq!(state.anchor(), Some("item1"));
    }

    #[test]
    fn test_range_select_uses_view_positions() {
        let raw = make_items(8);
        // View is a reordered subset of the raw list
        let view: Vec<Item> = [7, 0, 5, 2, 6, 3, 1]
            .iter()
            .map(|&i| raw[i].clone())
            .collect();

        let mut state = SelectionState::new();
        state.toggle(&view[2].id);
        let added = state.range_select(&view[5].id, &view);

        assert_eq!(added, 3);
        let expected: HashSet<String> = view[2..=5].iter().map(|i| i.id.clone()).collect();
        assert_eq!(state.selected(), &expected);
        assert_eq!(state.anchor(), Some(view[5].id.as_str()));
    }

    #[test]
    fn test_range_select_backwards() {
        let items = make_items(6);
        let mut state = SelectionState::new();
        state.toggle("item4");
        state.range_select("item1", &items);
        assert_eq!(ids(&state), vec!["item1", "item2", "item3", "item4"]);
    }

    #[test]
    fn test_range_select_only_adds() {
        let items = make_items(6);
        let mut state = SelectionState::new();
        state.toggle("item0");
        state.toggle("item5");
        state.toggle("item2");
        let added = state.range_select("item3", &items);

        assert_eq!(added, 1);
        assert_eq!(ids(&state), vec!["item0", "item2", "item3", "item5"]);
    }

    #[test]
    fn test_range_select_noop_cases() {
        let items = make_items(4);

        // Empty selection
        let mut state = SelectionState::new();
        assert_eq!(state.range_select("item2", &items), 0);
        assert!(state.is_empty());

        // Anchor missing from the view
        let mut state = SelectionState::new();
        state.toggle("gone");
        assert_eq!(state.range_select("item2", &items), 0);
        assert_eq!(ids(&state), vec!["gone"]);

        // Target missing from the view
        let mut state = SelectionState::new();
        state.toggle("item1");
        assert_eq!(state.range_select("gone", &items), 0);
        assert_eq!(state.anchor(), Some("item1"));
    }

    #[test]
    fn test_select_all_toggles() {
        let items = make_items(3);
        let mut state = SelectionState::new();
        state.toggle("elsewhere");

        state.select_all(&items);
        assert_eq!(ids(&state), vec!["item0", "item1", "item2"]);

        state.select_all(&items);
        assert!(state.is_empty());
        assert_eq!(state.anchor(), None);
    }

    #[test]
    fn test_select_all_clears_ids_outside_list() {
        let all = make_items(5);
        let mut state = SelectionState::new();
        state.select_all(&all);
        // Every id in the subset is already selected, so this clears everything
        state.select_all(&all[1..3]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_select_all_empty_list_is_noop() {
        let mut state = SelectionState::new();
        state.toggle("item0");
        state.select_all(&[]);
        assert_eq!(ids(&state), vec!["item0"]);
    }

    #[test]
    fn test_view_mode_requires_selection() {
        let mut state = SelectionState::new();
        assert_eq!(state.set_view_mode(ViewMode::ShowSelectedOnly), ViewMode::Normal);

        state.toggle("item0");
        assert_eq!(state.set_view_mode(ViewMode::ShowSelectedOnly), ViewMode::ShowSelectedOnly);
        assert_eq!(state.set_view_mode(ViewMode::HideSelected), ViewMode::HideSelected);
        assert_eq!(state.toggle_view_mode(ViewMode::HideSelected), ViewMode::Normal);
    }

    #[test]
    fn test_clear_resets_view_mode() {
        let mut state = SelectionState::new();
        state.toggle("item0");
        state.set_view_mode(ViewMode::HideSelected);
        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.view_mode(), ViewMode::Normal);
    }

    #[test]
    fn test_emptying_selection_resets_view_mode() {
        let mut state = SelectionState::new();
        state.toggle("item0");
        state.set_view_mode(ViewMode::ShowSelectedOnly);
        state.toggle("item0");
        assert_eq!(state.view_mode(), ViewMode::Normal);
    }

    #[test]
    fn test_admits() {
        let items = make_items(2);
        let mut state = SelectionState::new();
        state.toggle("item0");
        assert!(state.admits(&items[0]) && state.admits(&items[1]));

        state.set_view_mode(ViewMode::ShowSelectedOnly);
        assert!(state.admits(&items[0]));
        assert!(!state.admits(&items[1]));

        state.set_view_mode(ViewMode::HideSelected);
        assert!(!state.admits(&items[0]));
        assert!(state.admits(&items[1]));
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut state = SelectionState::new();
        let start = state.revision();
        state.toggle("a");
        assert!(state.revision() > start);
        let after_toggle = state.revision();
        state.clear();
        assert!(state.revision() > after_toggle);
    }

    #[test]
    fn test_retain_drops_anchor_and_mode() {
        let mut state = SelectionState::new();
        state.toggle("keep");
        state.toggle("gone");
        state.set_view_mode(ViewMode::ShowSelectedOnly);

        assert_eq!(state.retain(|id| id == "keep"), 1);
        assert_eq!(state.anchor(), None);
        assert_eq!(state.view_mode(), ViewMode::ShowSelectedOnly);

        assert_eq!(state.retain(|_| false), 1);
        assert_eq!(state.view_mode(), ViewMode::Normal);
    }

    #[test]
    fn test_selected_in_view_order() {
        let items = make_items(4);
        let mut state = SelectionState::new();
        state.toggle("item3");
        state.toggle("item1");
        let picked: Vec<&str> = state.selected_in(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(picked, vec!["item1", "item3"]);
    }
}
