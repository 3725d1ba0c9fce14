//! Filter state and evaluation
//!
//! This module holds the user's filter dimensions and turns a raw item list
//! into the view list:
//!
//! - **Keywords**: include (all must match) and exclude (none may match),
//!   case-insensitive substring
//! - **Condition flags**: fixed exclusion rules (junk, low bids, bundles, new,
//!   free shipping)
//! - **Tags**: item passes with at least one selected tag
//! - **Price bands**: item passes inside at least one band
//!
//! # Examples
//!
//! ```
//! use lotsift::Item;
//! use lotsift::filters::{apply, ConditionFlag, FilterState, PriceBand};
//! use lotsift::selection::SelectionState;
//! use lotsift::taxonomy::TagExtractor;
//!
//! let items = vec![
//!     Item::new("1", "Canon AE-1 ジャンク", 800),
//!     Item::new("2", "Canon AE-1 美品", 12_000),
//! ];
//!
//! let mut filter = FilterState::new();
//! filter.add_include_keyword("canon");
//! filter.toggle_flag(ConditionFlag::ExcludeJunk);
//! filter.toggle_band(PriceBand::from_range(10_000, None).unwrap());
//!
//! let view = apply(&items, &filter, &SelectionState::new(), &TagExtractor::default());
//! assert_eq!(view.len(), 1);
//! assert_eq!(view[0].id, "2");
//! ```

pub mod error;
pub mod evaluator;
pub mod sort;
pub mod types;

pub use error::FilterError;
pub use evaluator::{Matcher, apply, is_active};
pub use sort::{SortOrder, sort_items};
pub use types::{ConditionFlag, FilterState, PriceBand};
