//! Command-line interface definitions and parsing
//!
//! Item files are JSON arrays of listings, one file per fetched page. When
//! several files are given they are appended in order, the same way a
//! paginated search grows. `-` reads a page from stdin.
//!
//! # Commands
//!
//! - **filter**: Print the view list after filtering, selection and sorting
//! - **stats**: Price statistics and histogram, baseline and filtered
//! - **tags**: The taxonomy, or tag counts over a set of pages
//! - **config**: Show or initialise the configuration file
//! - **completions**: Shell completion scripts
//!
//! # Examples
//!
//! ```
//! use lotsift::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["lotsift", "filter", "page1.json", "-i", "canon", "--no-junk"]);
//! assert!(matches!(cli.command, Commands::Filter { .. }));
//! ```

use crate::explorer::Explorer;
use crate::filters::{ConditionFlag, PriceBand, SortOrder};
use crate::selection::ViewMode;
use crate::{Item, LotsiftError};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Output format for results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable, colored when writing to a terminal
    #[default]
    Text,
    /// JSON document
    Json,
    /// CSV rows
    Csv,
}

/// Shared arguments describing the filter and selection state
#[derive(Parser, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Title must contain this keyword (repeatable, all must match)
    #[arg(short = 'i', long = "include", value_name = "KEYWORD")]
    pub include: Vec<String>,

    /// Title must not contain this keyword (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "KEYWORD")]
    pub exclude: Vec<String>,

    /// Keep items carrying this tag (repeatable, any may match)
    #[arg(short = 't', long = "tag", value_name = "KEYWORD")]
    pub tags: Vec<String>,

    /// Keep items priced in MIN-MAX, or MIN- for no upper bound (repeatable)
    #[arg(short = 'b', long = "band", value_name = "MIN-MAX")]
    pub bands: Vec<PriceBand>,

    /// Drop junk listings
    #[arg(long = "no-junk")]
    pub no_junk: bool,

    /// Drop listings with fewer than two bids
    #[arg(long = "no-low-bids")]
    pub no_low_bids: bool,

    /// Drop bundles and sets
    #[arg(long = "no-bundle")]
    pub no_bundle: bool,

    /// Drop new and unused listings
    #[arg(long = "no-new")]
    pub no_new: bool,

    /// Drop listings with free shipping
    #[arg(long = "no-free-shipping")]
    pub no_free_shipping: bool,

    /// Select an item by id (repeatable)
    #[arg(short = 's', long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Extend the selection from the last selected item to this id
    #[arg(long = "extend-to", value_name = "ID")]
    pub extend_to: Option<String>,

    /// Show only selected items
    #[arg(long = "only-selected", conflicts_with = "hide_selected")]
    pub only_selected: bool,

    /// Hide selected items
    #[arg(long = "hide-selected", conflicts_with = "only_selected")]
    pub hide_selected: bool,

    /// Sort order (overrides config)
    #[arg(long = "sort", value_enum)]
    pub sort: Option<SortOrder>,
}

impl FilterArgs {
    /// Condition flags switched on by this invocation
    #[must_use]
    pub fn flags(&self) -> Vec<ConditionFlag> {
        [
            (self.no_junk, ConditionFlag::ExcludeJunk),
            (self.no_low_bids, ConditionFlag::ExcludeLowBids),
            (self.no_bundle, ConditionFlag::ExcludeBundle),
            (self.no_new, ConditionFlag::ExcludeNew),
            (self.no_free_shipping, ConditionFlag::ExcludeFreeShipping),
        ]
        .into_iter()
        .filter_map(|(on, flag)| on.then_some(flag))
        .collect()
    }

    /// Requested view mode
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        if self.only_selected {
            ViewMode::ShowSelectedOnly
        } else if self.hide_selected {
            ViewMode::HideSelected
        } else {
            ViewMode::Normal
        }
    }

    /// Replay these arguments as explorer operations
    ///
    /// Filters go first so selection clicks land on the filtered view.
    pub fn apply_to(&self, explorer: &mut Explorer) {
        for kw in &self.include {
            explorer.add_include_keyword(kw);
        }
        for kw in &self.exclude {
            explorer.add_exclude_keyword(kw);
        }
        for tag in &self.tags {
            if !explorer.filter().tags().contains(tag) {
                explorer.toggle_tag(tag);
            }
        }
        for band in &self.bands {
            if !explorer.filter().bands().iter().any(|b| b.same_range(band)) {
                explorer.toggle_band(band.clone());
            }
        }
        for flag in self.flags() {
            if !explorer.filter().flag(flag) {
                explorer.toggle_flag(flag);
            }
        }
        if let Some(sort) = self.sort {
            explorer.set_sort(sort);
        }

        for id in &self.select {
            if !explorer.selection().is_selected(id) {
                explorer.click(id, false);
            }
        }
        if let Some(id) = &self.extend_to {
            explorer.click(id, true);
        }
        explorer.set_view_mode(self.view_mode());
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Filter, select and sort result pages
    #[command(visible_alias = "f")]
    Filter {
        /// Item pages (JSON arrays), appended in order
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        filter_args: FilterArgs,

        /// Print at most this many items
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,

        /// Only print selected items, in view order
        #[arg(long = "selected")]
        selected: bool,
    },

    /// Price statistics for result pages
    #[command(visible_alias = "s")]
    Stats {
        /// Item pages (JSON arrays), appended in order
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        filter_args: FilterArgs,
    },

    /// List the taxonomy, or count tags over result pages
    Tags {
        /// Item pages to count tags in
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "lotsift")]
#[command(about = "Filter, tag and summarise auction search results", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// More logging on stderr (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Taxonomy file (overrides config)
    #[arg(long = "taxonomy", value_name = "PATH", global = true)]
    pub taxonomy: Option<PathBuf>,

    /// Currency symbol for prices (overrides config)
    #[arg(long = "currency", value_name = "SYMBOL", global = true)]
    pub currency: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Read one page of items from `path`, or stdin for `-`
///
/// # Errors
///
/// Returns `LotsiftError::IoError` if the file cannot be read and
/// `LotsiftError::JsonError` if it is not a JSON array of items.
pub fn read_page(path: &Path) -> Result<Vec<Item>, LotsiftError> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(serde_json::from_str(&text)?);
    }
    let reader = BufReader::new(File::open(path)?);
    let items: Vec<Item> = serde_json::from_reader(reader)?;
    tracing::debug!(path = %path.display(), items = items.len(), "read page");
    Ok(items)
}

/// Append every page in `paths` to `explorer`, in order
///
/// Returns how many items were added after de-duplication.
///
/// # Errors
///
/// Fails on the first page that cannot be read.
pub fn load_pages(explorer: &mut Explorer, paths: &[PathBuf]) -> Result<usize, LotsiftError> {
    let mut added = 0;
    for path in paths {
        let page = read_page(path)?;
        added += explorer.append(page);
    }
    Ok(added)
}
