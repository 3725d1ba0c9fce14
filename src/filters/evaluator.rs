//! Filter evaluation
//!
//! [`apply`] is re-run on every keystroke, so it returns the input slice
//! untouched when nothing is active instead of copying it. When dimensions
//! are active they are checked cheapest first; all of them are ANDed, so
//! the order only affects speed, never the result.
//!
//! Items without a price fail any active price band but are still subject
//! to keyword rules. Items without a title are treated as having an empty
//! title and no tags.

use super::types::{ConditionFlag, FilterState, PriceBand};
use crate::Item;
use crate::selection::{SelectionState, ViewMode};
use crate::taxonomy::TagSource;
use std::borrow::Cow;

/// Filter `items` by every active dimension
///
/// Returns `Cow::Borrowed(items)` when no dimension is active. Input order
/// is always preserved.
pub fn apply<'a, T>(
    items: &'a [Item],
    filter: &FilterState,
    selection: &SelectionState,
    tags: &T,
) -> Cow<'a, [Item]>
where
    T: TagSource + ?Sized,
{
    if !is_active(filter, selection) {
        return Cow::Borrowed(items);
    }

    let matcher = Matcher::new(filter, selection);
    let kept: Vec<Item> = items
        .iter()
        .filter(|item| matcher.matches(item, tags))
        .cloned()
        .collect();

    tracing::debug!(input = items.len(), kept = kept.len(), "filter pass");
    Cow::Owned(kept)
}

/// Whether [`apply`] would do any work
#[must_use]
pub fn is_active(filter: &FilterState, selection: &SelectionState) -> bool {
    filter.is_active() || selection.view_mode() != ViewMode::Normal
}

/// Filter state compiled for repeated matching
///
/// Keywords are lowercased once here instead of once per item.
pub struct Matcher<'s> {
    selection: &'s SelectionState,
    bands: &'s [PriceBand],
    tags: &'s [String],
    flags: Vec<ConditionFlag>,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl<'s> Matcher<'s> {
    #[must_use]
    pub fn new(filter: &'s FilterState, selection: &'s SelectionState) -> Self {
        let lower = |list: &[String]| -> Vec<String> {
            list.iter().map(|k| k.to_lowercase()).collect()
        };
        Self {
            selection,
            bands: filter.bands(),
            tags: filter.tags(),
            flags: filter.active_flags().collect(),
            include: lower(filter.include_keywords()),
            exclude: lower(filter.exclude_keywords()),
        }
    }

    /// Whether `item` passes every active dimension
    pub fn matches<T: TagSource + ?Sized>(&self, item: &Item, tags: &T) -> bool {
        if !self.selection.admits(item) {
            return false;
        }

        if !self.bands.is_empty() {
            let Some(price) = item.price else {
                return false;
            };
            if !self.bands.iter().any(|band| band.contains(price)) {
                return false;
            }
        }

        if !self.flags.is_empty() || !self.include.is_empty() || !self.exclude.is_empty() {
            let title = item.title_or_empty().to_lowercase();
            if self.flags.iter().any(|flag| flag.excludes(item, &title)) {
                return false;
            }
            if self.exclude.iter().any(|kw| title.contains(kw.as_str())) {
                return false;
            }
            if !self.include.iter().all(|kw| title.contains(kw.as_str())) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let item_tags = tags.tags_for(item);
            if !item_tags.iter().any(|tag| self.tags.contains(&tag.keyword)) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TagExtractor;

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("1", "Canon AE-1 ジャンク", 800).with_bids(0),
            Item::new("2", "Nikon F3 美品 送料無料", 25_000).with_bids(12),
            Item::new("3", "Canon レンズ まとめ セット", 1_500).with_bids(3),
            Item::new("4", "Pentax 新品 未開封", 9_999).with_bids(1),
            Item::new("5", "Olympus OM-1 JUNK parts", 2_500).with_bids(5),
            Item {
                price: None,
                ..Item::new("6", "Canon price unknown", 0)
            },
            Item {
                title: None,
                ..Item::new("7", "", 400)
            },
        ]
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn run(filter: &FilterState) -> Vec<String> {
        let items = catalog();
        let out = apply(&items, filter, &SelectionState::new(), &TagExtractor::default());
        out.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_identity_when_inactive() {
        let items = catalog();
        let out = apply(&items, &FilterState::new(), &SelectionState::new(), &TagExtractor::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), items.as_slice());
    }

    #[test]
    fn test_include_keywords_and_case_insensitive() {
        let mut filter = FilterState::new();
        filter.add_include_keyword("canon");
        assert_eq!(run(&filter), vec!["1", "3", "6"]);

        filter.add_include_keyword("レンズ");
        assert_eq!(run(&filter), vec!["3"]);
    }

    #[test]
    fn test_exclude_keywords() {
        let mut filter = FilterState::new();
        filter.add_exclude_keyword("CANON");
        filter.add_exclude_keyword("olympus");
        assert_eq!(run(&filter), vec!["2", "4", "7"]);
    }

    #[test]
    fn test_missing_title_is_empty_string() {
        let mut filter = FilterState::new();
        filter.add_include_keyword("a");
        assert!(!run(&filter).contains(&"7".to_string()));

        let mut filter = FilterState::new();
        filter.add_exclude_keyword("a");
        assert!(run(&filter).contains(&"7".to_string()));
    }

    #[test]
    fn test_exclude_junk_removes_both_markers_only() {
        let mut filter = FilterState::new();
        filter.toggle_flag(ConditionFlag::ExcludeJunk);
        assert_eq!(run(&filter), vec!["2", "3", "4", "6", "7"]);

        filter.toggle_flag(ConditionFlag::ExcludeJunk);
        assert_eq!(run(&filter).len(), catalog().len());
    }

    #[test]
    fn test_condition_flags() {
        let mut filter = FilterState::new();
        filter.set_flag(ConditionFlag::ExcludeBundle, true);
        filter.set_flag(ConditionFlag::ExcludeNew, true);
        filter.set_flag(ConditionFlag::ExcludeFreeShipping, true);
        assert_eq!(run(&filter), vec!["1", "5", "6", "7"]);

        let mut filter = FilterState::new();
        filter.set_flag(ConditionFlag::ExcludeLowBids, true);
        assert_eq!(run(&filter), vec!["2", "3", "5"]);
    }

    #[test]
    fn test_price_bands_or() {
        let mut filter = FilterState::new();
        filter.toggle_band(PriceBand::from_range(0, Some(1000)).unwrap());
        filter.toggle_band(PriceBand::from_range(1000, Some(2000)).unwrap());
        // Missing price never matches a band
        assert_eq!(run(&filter), vec!["1", "3", "7"]);
    }

    #[test]
    fn test_band_boundaries() {
        let items = vec![
            Item::new("a", "x", 999),
            Item::new("b", "x", 1500),
            Item::new("c", "x", 2500),
        ];
        let mut filter = FilterState::new();
        filter.toggle_band(PriceBand::from_range(0, Some(1000)).unwrap());
        filter.toggle_band(PriceBand::from_range(1000, Some(2000)).unwrap());
        let out = apply(&items, &filter, &SelectionState::new(), &TagExtractor::default());
        assert_eq!(ids(&out), vec!["a", "b"]);
    }

    #[test]
    fn test_tags_any_of() {
        let mut filter = FilterState::new();
        filter.toggle_tag("ジャンク");
        filter.toggle_tag("美品");
        // Tags are case-sensitive, so "JUNK" does not count
        assert_eq!(run(&filter), vec!["1", "2"]);
    }

    #[test]
    fn test_dimensions_are_anded() {
        let mut filter = FilterState::new();
        filter.add_include_keyword("canon");
        filter.toggle_band(PriceBand::from_range(1000, None).unwrap());
        assert_eq!(run(&filter), vec!["3"]);
    }

    #[test]
    fn test_view_modes() {
        let items = catalog();
        let mut selection = SelectionState::new();
        selection.toggle("2");
        selection.toggle("5");
        let tags = TagExtractor::default();
        let filter = FilterState::new();

        selection.set_view_mode(ViewMode::ShowSelectedOnly);
        assert_eq!(ids(&apply(&items, &filter, &selection, &tags)), vec!["2", "5"]);

        selection.set_view_mode(ViewMode::HideSelected);
        assert_eq!(
            ids(&apply(&items, &filter, &selection, &tags)),
            vec!["1", "3", "4", "6", "7"]
        );
    }

    #[test]
    fn test_idempotent() {
        let items = catalog();
        let mut filter = FilterState::new();
        filter.add_include_keyword("canon");
        filter.toggle_flag(ConditionFlag::ExcludeJunk);
        let selection = SelectionState::new();
        let tags = TagExtractor::default();

        let once = apply(&items, &filter, &selection, &tags).into_owned();
        let twice = apply(&once, &filter, &selection, &tags).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_add_then_remove_restores_output() {
        let items = catalog();
        let selection = SelectionState::new();
        let tags = TagExtractor::default();
        let mut filter = FilterState::new();
        filter.add_include_keyword("canon");
        let before = apply(&items, &filter, &selection, &tags).into_owned();

        let band = PriceBand::from_range(0, Some(1000)).unwrap();
        filter.toggle_band(band.clone());
        assert_ne!(apply(&items, &filter, &selection, &tags).as_ref(), before.as_slice());
        filter.toggle_band(band);

        assert_eq!(apply(&items, &filter, &selection, &tags).as_ref(), before.as_slice());
    }

    #[test]
    fn test_empty_items() {
        let mut filter = FilterState::new();
        filter.add_include_keyword("x");
        let out = apply(&[], &filter, &SelectionState::new(), &TagExtractor::default());
        assert!(out.is_empty());
    }
}
