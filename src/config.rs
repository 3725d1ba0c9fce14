//! Configuration module for lotsift
//!
//! Settings live in `config.toml` under the user's config directory and can
//! be overridden per field with `LOTSIFT_*` environment variables, e.g.
//! `LOTSIFT_CURRENCY_SYMBOL=$`.

use crate::filters::SortOrder;
use crate::stats::DEFAULT_CURRENCY;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LOTSIFT";

const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LotsiftConfig {
    /// Symbol prefixed to prices in labels
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Taxonomy TOML file; the built-in taxonomy is used when unset
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    /// Sort order applied when none is given on the command line
    #[serde(default)]
    pub default_sort: SortOrder,

    /// How many derived views each explorer cache keeps
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

const fn default_cache_capacity() -> u64 {
    DEFAULT_CACHE_CAPACITY
}

impl Default for LotsiftConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            taxonomy_path: None,
            default_sort: SortOrder::None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            quiet: false,
        }
    }
}

impl LotsiftConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("lotsift").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// A missing file is not an error; defaults plus environment overrides
    /// are used instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, then apply environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed,
    /// or an override has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Same as [`LotsiftConfig::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LotsiftConfig::default();
        assert_eq!(config.currency_symbol, "¥");
        assert_eq!(config.default_sort, SortOrder::None);
        assert_eq!(config.cache_capacity, 64);
        assert!(config.taxonomy_path.is_none());
        assert!(!config.quiet);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LotsiftConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.cache_capacity, LotsiftConfig::default().cache_capacity);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_sort = \"price_desc\"\nquiet = true\n").unwrap();

        let config = LotsiftConfig::load_from(&path).unwrap();
        assert_eq!(config.default_sort, SortOrder::PriceDesc);
        assert!(config.quiet);
        assert_eq!(config.currency_symbol, "¥");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = LotsiftConfig {
            currency_symbol: "$".to_string(),
            taxonomy_path: Some(PathBuf::from("/tmp/tags.toml")),
            default_sort: SortOrder::PriceAsc,
            cache_capacity: 8,
            quiet: true,
        };
        config.save_to(&path).unwrap();

        assert_eq!(LotsiftConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_value_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_sort = \"cheapest\"\n").unwrap();
        assert!(LotsiftConfig::load_from(&path).is_err());
    }
}
