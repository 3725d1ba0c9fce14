//! Sorting the filtered list
//!
//! Sorting is the last step of the pipeline and is stable. `SortOrder::None`
//! hands back the filtered list in input order rather than any earlier sort.

use crate::Item;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Sort applied to the view list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep input order
    #[default]
    None,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

/// Sort `items` by `order`, keeping ties in input order
///
/// Items without a price go last in both directions.
#[must_use]
pub fn sort_items(items: Cow<'_, [Item]>, order: SortOrder) -> Cow<'_, [Item]> {
    if order == SortOrder::None || items.len() < 2 {
        return items;
    }
    let mut items = items;
    items.to_mut().sort_by(|a, b| compare(a, b, order));
    items
}

fn compare(a: &Item, b: &Item, order: SortOrder) -> Ordering {
    match (a.price, b.price) {
        (Some(pa), Some(pb)) => match order {
            SortOrder::PriceDesc => pb.cmp(&pa),
            _ => pa.cmp(&pb),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
