//! Price statistics
//!
//! Summaries are derived from an item list and never mutated in place:
//! min, max, median, mean and an adaptive ten-bucket price histogram.

pub mod engine;
pub mod format;

pub use engine::{BUCKET_COUNT, PriceBucket, Statistics, summarize, summarize_with};
pub use format::{DEFAULT_CURRENCY, format_price, range_label};
