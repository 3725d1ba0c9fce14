//! Loading taxonomies from TOML
//!
//! A taxonomy file is a list of `[[tags]]` tables:
//!
//! ```toml
//! [[tags]]
//! keyword = "ジャンク"
//! label = "Junk"
//! style = "tag-red"
//! group = "junk"
//! ```

use super::error::TaxonomyError;
use super::types::Taxonomy;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

impl Taxonomy {
    /// Parse and validate a taxonomy from TOML text
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError` if the text is not valid TOML, a keyword is
    /// empty, or two tags share a keyword.
    pub fn from_toml_str(text: &str) -> Result<Self, TaxonomyError> {
        let taxonomy: Self = toml::from_str(text)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Load a taxonomy file
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError` if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let text = fs::read_to_string(path)?;
        let taxonomy = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), tags = taxonomy.len(), "loaded taxonomy");
        Ok(taxonomy)
    }

    /// Load `path` if given, otherwise use the built-in taxonomy
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError` if the given file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, TaxonomyError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    fn validate(&self) -> Result<(), TaxonomyError> {
        let mut seen = HashSet::new();
        for tag in &self.tags {
            if tag.keyword.is_empty() {
                return Err(TaxonomyError::EmptyKeyword(tag.label.clone()));
            }
            if !seen.insert(tag.keyword.as_str()) {
                return Err(TaxonomyError::DuplicateKeyword(tag.keyword.clone()));
            }
        }
        Ok(())
    }
}
