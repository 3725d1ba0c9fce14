//! Lotsift - layered filtering and price statistics for auction search results
//!
//! This library takes a raw list of auction items and a mutable filter and
//! selection state, and deterministically derives a filtered/sorted view,
//! a price-distribution summary with adaptive histogram binning, and a
//! multi-item selection model with anchor-based range selection.
//!
//! Fetching result pages and rendering them are left to the caller; the
//! [`explorer::Explorer`] type is the entry point for a UI that wants
//! memoized derived views.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cli;
pub mod config;
pub mod explorer;
pub mod filters;
pub mod logging;
pub mod output;
pub mod selection;
pub mod stats;
pub mod summary;
pub mod taxonomy;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum LotsiftError {
    /// Filter mutation was rejected
    #[error("Filter error: {0}")]
    FilterError(#[from] filters::FilterError),
    /// Tag taxonomy could not be loaded
    #[error("Taxonomy error: {0}")]
    TaxonomyError(#[from] taxonomy::TaxonomyError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Item pages could not be parsed or results could not be serialized
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// CSV output failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A single auction listing as delivered by the fetch layer
///
/// Items are never mutated by the pipeline. The `id` is the only join key
/// used for filtering, selection, sorting and tag caching. Every other field
/// is optional on the wire so a malformed page still loads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub bid_count: u32,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub detail_url: Option<String>,
}

impl Item {
    /// Create an item with a title and price and no other details
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            price: Some(price),
            bid_count: 0,
            end_time: String::new(),
            image_url: None,
            detail_url: None,
        }
    }

    /// Set the bid count
    #[must_use]
    pub const fn with_bids(mut self, bid_count: u32) -> Self {
        self.bid_count = bid_count;
        self
    }

    /// Title, or the empty string when the listing had none
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}
