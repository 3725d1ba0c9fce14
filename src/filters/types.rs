//! Filter data structures
//!
//! This module defines the filter dimensions a user can toggle:
//! - `PriceBand`: a half-open price interval, OR-combined with other bands
//! - `ConditionFlag`: fixed title/bid rules that exclude items
//! - `FilterState`: every dimension together, AND-combined
//!
//! `FilterState` fields are private. All mutation goes through named
//! operations so the state can never hold duplicate keywords, tags or bands.

use super::error::FilterError;
use crate::stats::format::{DEFAULT_CURRENCY, range_label};
use crate::Item;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half-open price interval `[min, max)`
///
/// `max = None` means unbounded above. Band identity for toggling is the
/// `(min, max)` pair; the label is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: u64,
    pub max: Option<u64>,
    pub label: String,
}

impl PriceBand {
    /// Create a band with an explicit label
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidBand` if `max` is set and not above `min`.
    pub fn new(min: u64, max: Option<u64>, label: impl Into<String>) -> Result<Self, FilterError> {
        if let Some(max) = max
            && min >= max
        {
            return Err(FilterError::InvalidBand { min, max });
        }
        Ok(Self {
            min,
            max,
            label: label.into(),
        })
    }

    /// Create a band labelled from its bounds
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidBand` if `max` is set and not above `min`.
    pub fn from_range(min: u64, max: Option<u64>) -> Result<Self, FilterError> {
        Self::new(min, max, range_label(min, max, DEFAULT_CURRENCY))
    }

    /// Exclusive upper bound, `u64::MAX` when unbounded
    #[must_use]
    pub fn upper(&self) -> u64 {
        self.max.unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price < self.upper()
    }

    /// Whether two bands cover the same interval, ignoring labels
    #[must_use]
    pub fn same_range(&self, other: &Self) -> bool {
        self.min == other.min && self.upper() == other.upper()
    }

    /// Stable key used for badges and dismissal
    #[must_use]
    pub fn key(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{max}", self.min),
            None => format!("{}-", self.min),
        }
    }

    /// Default band ladder offered by the UI
    #[must_use]
    pub fn presets() -> Vec<Self> {
        [
            (0, Some(1_000)),
            (1_000, Some(3_000)),
            (3_000, Some(5_000)),
            (5_000, Some(10_000)),
            (10_000, Some(30_000)),
            (30_000, None),
        ]
        .into_iter()
        .filter_map(|(min, max)| Self::from_range(min, max).ok())
        .collect()
    }
}

impl FromStr for PriceBand {
    type Err = FilterError;

    /// Parse `MIN-MAX` or `MIN-` (unbounded)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || FilterError::BandSyntax(s.to_string());
        let (min, max) = s.trim().split_once('-').ok_or_else(syntax)?;
        let min = min.trim().replace(',', "").parse::<u64>().map_err(|_| syntax())?;
        let max = match max.trim() {
            "" => None,
            max => Some(max.replace(',', "").parse::<u64>().map_err(|_| syntax())?),
        };
        Self::from_range(min, max)
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Fixed exclusion rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionFlag {
    /// Drop junk / for-parts listings
    ExcludeJunk,
    /// Drop listings with fewer than two bids
    ExcludeLowBids,
    /// Drop bundles and sets
    ExcludeBundle,
    /// Drop new and unused listings
    ExcludeNew,
    /// Drop listings advertising free shipping
    ExcludeFreeShipping,
}

impl ConditionFlag {
    /// Every flag, in badge order
    pub const ALL: [Self; 5] = [
        Self::ExcludeJunk,
        Self::ExcludeLowBids,
        Self::ExcludeBundle,
        Self::ExcludeNew,
        Self::ExcludeFreeShipping,
    ];

    /// Lowercase title markers that trigger the exclusion
    #[must_use]
    pub const fn markers(self) -> &'static [&'static str] {
        match self {
            Self::ExcludeJunk => &["ジャンク", "junk"],
            Self::ExcludeLowBids => &[],
            Self::ExcludeBundle => &["まとめ", "セット"],
            Self::ExcludeNew => &["新品", "未使用"],
            Self::ExcludeFreeShipping => &["送料無料"],
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExcludeJunk => "No junk",
            Self::ExcludeLowBids => "2+ bids",
            Self::ExcludeBundle => "No bundles",
            Self::ExcludeNew => "No new items",
            Self::ExcludeFreeShipping => "No free shipping",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ExcludeJunk => "exclude_junk",
            Self::ExcludeLowBids => "exclude_low_bids",
            Self::ExcludeBundle => "exclude_bundle",
            Self::ExcludeNew => "exclude_new",
            Self::ExcludeFreeShipping => "exclude_free_shipping",
        }
    }

    /// Whether this rule removes the item
    ///
    /// `lowered_title` must be the item's title in lowercase.
    #[must_use]
    pub fn excludes(self, item: &Item, lowered_title: &str) -> bool {
        match self {
            Self::ExcludeLowBids => item.bid_count < 2,
            _ => self.markers().iter().any(|m| lowered_title.contains(m)),
        }
    }
}

/// Every filter dimension the user can set
///
/// Dimensions combine with AND. Within the tag and price-band dimensions
/// an item passes if it matches ANY entry; an empty list is no constraint.
/// List order is insertion order, which keeps badge order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    include: Vec<String>,
    exclude: Vec<String>,
    exclude_junk: bool,
    exclude_low_bids: bool,
    exclude_bundle: bool,
    exclude_new: bool,
    exclude_free_shipping: bool,
    tags: Vec<String>,
    bands: Vec<PriceBand>,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keywords that must all occur in the title
    #[must_use]
    pub fn include_keywords(&self) -> &[String] {
        &self.include
    }

    /// Keywords that must not occur in the title
    #[must_use]
    pub fn exclude_keywords(&self) -> &[String] {
        &self.exclude
    }

    /// Selected tag keywords
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Active price bands
    #[must_use]
    pub fn bands(&self) -> &[PriceBand] {
        &self.bands
    }

    /// Add an include keyword
    ///
    /// Keywords are trimmed; empty keywords and case-insensitive duplicates
    /// are ignored. Returns true if the keyword was added.
    pub fn add_include_keyword(&mut self, keyword: &str) -> bool {
        push_keyword(&mut self.include, keyword)
    }

    /// Remove an include keyword (case-insensitive). Returns true if removed.
    pub fn remove_include_keyword(&mut self, keyword: &str) -> bool {
        remove_keyword(&mut self.include, keyword)
    }

    /// Add an exclude keyword. Returns true if the keyword was added.
    pub fn add_exclude_keyword(&mut self, keyword: &str) -> bool {
        push_keyword(&mut self.exclude, keyword)
    }

    /// Remove an exclude keyword (case-insensitive). Returns true if removed.
    pub fn remove_exclude_keyword(&mut self, keyword: &str) -> bool {
        remove_keyword(&mut self.exclude, keyword)
    }

    #[must_use]
    pub const fn flag(&self, flag: ConditionFlag) -> bool {
        match flag {
            ConditionFlag::ExcludeJunk => self.exclude_junk,
            ConditionFlag::ExcludeLowBids => self.exclude_low_bids,
            ConditionFlag::ExcludeBundle => self.exclude_bundle,
            ConditionFlag::ExcludeNew => self.exclude_new,
            ConditionFlag::ExcludeFreeShipping => self.exclude_free_shipping,
        }
    }

    pub const fn set_flag(&mut self, flag: ConditionFlag, on: bool) {
        let slot = match flag {
            ConditionFlag::ExcludeJunk => &mut self.exclude_junk,
            ConditionFlag::ExcludeLowBids => &mut self.exclude_low_bids,
            ConditionFlag::ExcludeBundle => &mut self.exclude_bundle,
            ConditionFlag::ExcludeNew => &mut self.exclude_new,
            ConditionFlag::ExcludeFreeShipping => &mut self.exclude_free_shipping,
        };
        *slot = on;
    }

    /// Flip a flag. Returns the new value.
    pub const fn toggle_flag(&mut self, flag: ConditionFlag) -> bool {
        let on = !self.flag(flag);
        self.set_flag(flag, on);
        on
    }

    /// Flags currently switched on, in badge order
    pub fn active_flags(&self) -> impl Iterator<Item = ConditionFlag> + '_ {
        ConditionFlag::ALL.into_iter().filter(|&f| self.flag(f))
    }

    /// Select or deselect a tag by keyword. Returns true if now selected.
    pub fn toggle_tag(&mut self, keyword: &str) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| t == keyword) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(keyword.to_string());
            true
        }
    }

    /// Add or remove a band, matched by exact `(min, max)`
    ///
    /// Returns true if the band is now active.
    pub fn toggle_band(&mut self, band: PriceBand) -> bool {
        if let Some(pos) = self.bands.iter().position(|b| b.same_range(&band)) {
            self.bands.remove(pos);
            false
        } else {
            self.bands.push(band);
            true
        }
    }

    /// Reset every dimension
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Whether any dimension constrains the result
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.include.is_empty()
            || !self.exclude.is_empty()
            || !self.tags.is_empty()
            || !self.bands.is_empty()
            || self.active_flags().next().is_some()
    }
}

fn push_keyword(list: &mut Vec<String>, keyword: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() || position_ignore_case(list, keyword).is_some() {
        return false;
    }
    list.push(keyword.to_string());
    true
}

fn remove_keyword(list: &mut Vec<String>, keyword: &str) -> bool {
    match position_ignore_case(list, keyword.trim()) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}

fn position_ignore_case(list: &[String], keyword: &str) -> Option<usize> {
    let lowered = keyword.to_lowercase();
    list.iter().position(|k| k.to_lowercase() == lowered)
}
