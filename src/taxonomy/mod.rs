//! Tag taxonomy and title tagging
//!
//! A taxonomy is a fixed, ordered list of keyword → label mappings. Titles are
//! tagged by plain substring containment, so tagging is deterministic and
//! always yields tags in taxonomy order.
//!
//! - [`Taxonomy`]: the static tag list, built-in or loaded from TOML
//! - [`TagExtractor`]: maps a title to its tags
//! - [`TagIndex`]: per-item tag cache keyed by item id
//! - [`TagSource`]: the seam the filter evaluator tags items through

pub mod error;
pub mod extractor;
pub mod loader;
pub mod types;

pub use error::TaxonomyError;
pub use extractor::{TagExtractor, TagIndex, TagSource};
pub use types::{Tag, TagGroup, Taxonomy};
