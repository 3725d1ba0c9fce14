//! Taxonomy loading errors

use std::io;
use thiserror::Error;

/// Errors that can occur while loading a tag taxonomy
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// Taxonomy file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Taxonomy file is not valid TOML for the expected layout
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A tag with an empty keyword would match every title
    #[error("Tag '{0}' has an empty keyword")]
    EmptyKeyword(String),

    /// Two tags share the same keyword
    #[error("Duplicate tag keyword '{0}'")]
    DuplicateKeyword(String),
}
