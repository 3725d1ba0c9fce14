//! Cache keys for derived views

use crate::filters::{FilterState, SortOrder};
use crate::selection::{SelectionState, ViewMode};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Which derived value a key belongs to
#[derive(Hash)]
enum Derived {
    Filtered,
    View,
    BaselineStats,
    FilteredStats,
}

/// Inputs shared by every key: which result list we are looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Source {
    pub generation: u64,
    pub len: usize,
}

/// Key for the unsorted filtered list, independent of the list length
///
/// Leaving the length out lets an appended list find the snapshot taken
/// before the append and extend it.
pub fn filtered(generation: u64, filter: &FilterState, selection: &SelectionState) -> u64 {
    let mut hasher = DefaultHasher::new();
    Derived::Filtered.hash(&mut hasher);
    generation.hash(&mut hasher);
    filter.hash(&mut hasher);
    selection_part(selection, &mut hasher);
    hasher.finish()
}

pub fn view(source: Source, filter: &FilterState, selection: &SelectionState, sort: SortOrder) -> u64 {
    let mut hasher = DefaultHasher::new();
    Derived::View.hash(&mut hasher);
    source.hash(&mut hasher);
    filter.hash(&mut hasher);
    selection_part(selection, &mut hasher);
    sort.hash(&mut hasher);
    hasher.finish()
}

pub fn baseline_stats(source: Source) -> u64 {
    let mut hasher = DefaultHasher::new();
    Derived::BaselineStats.hash(&mut hasher);
    source.hash(&mut hasher);
    hasher.finish()
}

/// Statistics do not depend on sort order
pub fn filtered_stats(source: Source, filter: &FilterState, selection: &SelectionState) -> u64 {
    let mut hasher = DefaultHasher::new();
    Derived::FilteredStats.hash(&mut hasher);
    source.hash(&mut hasher);
    filter.hash(&mut hasher);
    selection_part(selection, &mut hasher);
    hasher.finish()
}

/// The selection only shapes the view through a restricting view mode
fn selection_part(selection: &SelectionState, hasher: &mut DefaultHasher) {
    let mode = selection.view_mode();
    mode.hash(hasher);
    if mode != ViewMode::Normal {
        selection.revision().hash(hasher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: Source = Source { generation: 1, len: 10 };

    #[test]
    fn test_equal_inputs_equal_keys() {
        let mut a = FilterState::new();
        a.add_include_keyword("canon");
        let b = a.clone();
        let selection = SelectionState::new();
        assert_eq!(
            view(SOURCE, &a, &selection, SortOrder::None),
            view(SOURCE, &b, &selection, SortOrder::None)
        );
    }

    #[test]
    fn test_sort_changes_view_key_only() {
        let filter = FilterState::new();
        let selection = SelectionState::new();
        assert_ne!(
            view(SOURCE, &filter, &selection, SortOrder::None),
            view(SOURCE, &filter, &selection, SortOrder::PriceAsc)
        );
        assert_eq!(
            filtered_stats(SOURCE, &filter, &selection),
            filtered_stats(SOURCE, &filter, &selection)
        );
    }

    #[test]
    fn test_selection_ignored_in_normal_mode() {
        let filter = FilterState::new();
        let before = SelectionState::new();
        let mut after = before.clone();
        after.toggle("x");
        assert_eq!(
            filtered(1, &filter, &before),
            filtered(1, &filter, &after)
        );

        after.set_view_mode(ViewMode::HideSelected);
        assert_ne!(filtered(1, &filter, &before), filtered(1, &filter, &after));
    }

    #[test]
    fn test_length_only_in_sized_keys() {
        let filter = FilterState::new();
        let selection = SelectionState::new();
        let grown = Source { len: 20, ..SOURCE };
        assert_ne!(baseline_stats(SOURCE), baseline_stats(grown));
        assert_ne!(
            view(SOURCE, &filter, &selection, SortOrder::None),
            view(grown, &filter, &selection, SortOrder::None)
        );
    }
}
