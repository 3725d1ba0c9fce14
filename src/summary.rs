//! Active-filter summary
//!
//! Projects the filter and selection state into one display entry per
//! active condition, for badge rendering. Entry order is fixed by dimension
//! (include keywords, exclude keywords, tags, price bands, flags, view mode)
//! and by insertion order within a dimension, so badges never reshuffle on
//! unrelated changes.
//!
//! The `Display` impl on [`FilterState`] renders the equivalent command line,
//! e.g. `lotsift filter -i canon --band 0-1000 --no-junk`.

use crate::filters::{ConditionFlag, FilterState, PriceBand};
use crate::selection::{SelectionState, ViewMode};
use crate::taxonomy::Taxonomy;
use serde::Serialize;
use std::fmt;

/// One atomic active condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ActiveFilter {
    Include(String),
    Exclude(String),
    Tag(String),
    Band(PriceBand),
    Flag(ConditionFlag),
    ShowSelectedOnly,
}

impl ActiveFilter {
    /// Short type tag for styling badges
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Include(_) => "include",
            Self::Exclude(_) => "exclude",
            Self::Tag(_) => "tag",
            Self::Band(_) => "band",
            Self::Flag(_) => "flag",
            Self::ShowSelectedOnly => "view",
        }
    }
}

/// Display-ready badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilterEntry {
    pub filter: ActiveFilter,
    pub label: String,
    /// Unique among the entries of one summary
    pub key: String,
}

impl ActiveFilterEntry {
    fn new(filter: ActiveFilter, label: String, id: &str) -> Self {
        let key = format!("{}:{id}", filter.kind());
        Self { filter, label, key }
    }
}

/// Every active condition, in stable badge order
#[must_use]
pub fn summarize(filter: &FilterState, selection: &SelectionState) -> Vec<ActiveFilterEntry> {
    let mut entries = Vec::new();

    for kw in filter.include_keywords() {
        entries.push(ActiveFilterEntry::new(
            ActiveFilter::Include(kw.clone()),
            format!("Includes \"{kw}\""),
            kw,
        ));
    }
    for kw in filter.exclude_keywords() {
        entries.push(ActiveFilterEntry::new(
            ActiveFilter::Exclude(kw.clone()),
            format!("Excludes \"{kw}\""),
            kw,
        ));
    }
    for tag in filter.tags() {
        entries.push(ActiveFilterEntry::new(ActiveFilter::Tag(tag.clone()), tag.clone(), tag));
    }
    for band in filter.bands() {
        entries.push(ActiveFilterEntry::new(
            ActiveFilter::Band(band.clone()),
            band.label.clone(),
            &band.key(),
        ));
    }
    for flag in filter.active_flags() {
        entries.push(ActiveFilterEntry::new(
            ActiveFilter::Flag(flag),
            flag.label().to_string(),
            flag.key(),
        ));
    }
    if selection.view_mode() == ViewMode::ShowSelectedOnly {
        entries.push(ActiveFilterEntry::new(
            ActiveFilter::ShowSelectedOnly,
            format!("Selected only ({})", selection.len()),
            "selected_only",
        ));
    }

    entries
}

/// Like [`summarize`], with tag badges showing taxonomy labels
#[must_use]
pub fn summarize_labelled(
    filter: &FilterState,
    selection: &SelectionState,
    taxonomy: &Taxonomy,
) -> Vec<ActiveFilterEntry> {
    let mut entries = summarize(filter, selection);
    for entry in &mut entries {
        if let ActiveFilter::Tag(keyword) = &entry.filter
            && let Some(tag) = taxonomy.get(keyword)
        {
            entry.label.clone_from(&tag.label);
        }
    }
    entries
}

impl FilterState {
    /// Remove the condition behind one badge
    ///
    /// Returns false if it was not active. The view-mode badge lives in
    /// [`SelectionState`] and is not handled here.
    pub fn dismiss(&mut self, filter: &ActiveFilter) -> bool {
        match filter {
            ActiveFilter::Include(kw) => self.remove_include_keyword(kw),
            ActiveFilter::Exclude(kw) => self.remove_exclude_keyword(kw),
            ActiveFilter::Tag(tag) => self.tags().contains(tag) && !self.toggle_tag(tag),
            ActiveFilter::Band(band) => {
                self.bands().iter().any(|b| b.same_range(band)) && !self.toggle_band(band.clone())
            }
            ActiveFilter::Flag(flag) => {
                let was_on = self.flag(*flag);
                self.set_flag(*flag, false);
                was_on
            }
            ActiveFilter::ShowSelectedOnly => false,
        }
    }
}

impl fmt::Display for FilterState {
    /// Generate the equivalent `lotsift filter` invocation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lotsift filter")?;

        for kw in self.include_keywords() {
            write!(f, " -i {}", quoted(kw))?;
        }
        for kw in self.exclude_keywords() {
            write!(f, " -x {}", quoted(kw))?;
        }
        for tag in self.tags() {
            write!(f, " --tag {}", quoted(tag))?;
        }
        for band in self.bands() {
            write!(f, " --band {}", band.key())?;
        }
        for flag in self.active_flags() {
            let arg = match flag {
                ConditionFlag::ExcludeJunk => "--no-junk",
                ConditionFlag::ExcludeLowBids => "--no-low-bids",
                ConditionFlag::ExcludeBundle => "--no-bundle",
                ConditionFlag::ExcludeNew => "--no-new",
                ConditionFlag::ExcludeFreeShipping => "--no-free-shipping",
            };
            write!(f, " {arg}")?;
        }

        Ok(())
    }
}

fn quoted(s: &str) -> String {
    if needs_quoting(s) {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

/// Check if a string needs quoting in shell context
fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars().any(|c| {
            c.is_whitespace()
                || matches!(
                    c,
                    '$' | '"' | '\'' | '\\' | '&' | '|' | ';' | '(' | ')' | '<' | '>'
                )
        })
}
