//! Statistics engine with adaptive histogram binning
//!
//! Auction prices are heavy-tailed, so buckets spread evenly over
//! `[min, max]` would put almost every item in the first bucket. Instead the
//! histogram covers `[0, threshold)` with nine equal buckets and collects
//! everything at or above the threshold in a tenth, open-ended bucket:
//!
//! ```text
//! p75       = sorted[floor(0.75 * n)]
//! threshold = min(p75 * 1.5, median * 3)
//! ```
//!
//! Bucket bounds are rounded up to whole currency units. Prices are whole
//! units too, so `ceil(a) <= p < ceil(b)` holds exactly when `a <= p < b`.

use super::format::{DEFAULT_CURRENCY, range_label};
use crate::Item;
use crate::filters::PriceBand;
use serde::Serialize;

/// Total number of histogram buckets (nine bounded plus one open-ended)
pub const BUCKET_COUNT: usize = 10;

const BOUNDED_BUCKETS: usize = BUCKET_COUNT - 1;
const P75_MULTIPLIER: f64 = 1.5;
const MEDIAN_MULTIPLIER: f64 = 3.0;

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBucket {
    pub label: String,
    pub count: usize,
    pub range_start: u64,
    /// Exclusive upper edge, `None` for the final bucket
    pub range_end: Option<u64>,
}

impl PriceBucket {
    /// Share of `total` in this bucket, in `0.0..=1.0`
    #[must_use]
    pub fn share(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }

    /// The price band covering exactly this bucket's range
    ///
    /// Returns `None` for an empty-width bucket, which no band can express.
    #[must_use]
    pub fn to_band(&self) -> Option<PriceBand> {
        PriceBand::new(self.range_start, self.range_end, self.label.clone()).ok()
    }
}

/// Summary of the prices in an item list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of items that carried a price
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub median: f64,
    pub mean: f64,
    /// Lower edge of the open-ended bucket
    pub threshold: u64,
    pub buckets: Vec<PriceBucket>,
}

/// Summarize with the default currency symbol
///
/// Returns `None` when no item carries a price.
#[must_use]
pub fn summarize(items: &[Item]) -> Option<Statistics> {
    summarize_with(items, DEFAULT_CURRENCY)
}

/// Summarize, labelling buckets with `currency`
///
/// Items without a price are skipped. Returns `None` when nothing is left.
/// `count` and the bucket counts cover priced items only, so they sum to
/// `count` rather than `items.len()` when some prices are missing.
#[must_use]
pub fn summarize_with(items: &[Item], currency: &str) -> Option<Statistics> {
    let mut prices: Vec<u64> = items.iter().filter_map(|item| item.price).collect();
    if prices.is_empty() {
        return None;
    }
    prices.sort_unstable();

    let n = prices.len();
    let median = median_of(&prices);
    let mean = prices.iter().map(|&p| u128::from(p)).sum::<u128>() as f64 / n as f64;

    let p75 = prices[(n * 3 / 4).min(n - 1)] as f64;
    let threshold = f64::min(p75 * P75_MULTIPLIER, median * MEDIAN_MULTIPLIER);
    let bounds = bucket_bounds(threshold);
    let buckets = fill_buckets(&prices, &bounds, currency);

    tracing::trace!(n, median, threshold, "summarized prices");

    Some(Statistics {
        count: n,
        min: prices[0],
        max: prices[n - 1],
        median,
        mean,
        threshold: bounds[BOUNDED_BUCKETS],
        buckets,
    })
}

fn median_of(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    } else {
        sorted[n / 2] as f64
    }
}

/// Lower edges of all ten buckets; the last one is the threshold
fn bucket_bounds(threshold: f64) -> [u64; BUCKET_COUNT] {
    let width = threshold / BOUNDED_BUCKETS as f64;
    let mut bounds = [0u64; BUCKET_COUNT];
    for (idx, bound) in bounds.iter_mut().enumerate().take(BOUNDED_BUCKETS) {
        *bound = (idx as f64 * width).ceil() as u64;
    }
    bounds[BOUNDED_BUCKETS] = threshold.ceil() as u64;
    bounds
}

fn fill_buckets(sorted: &[u64], bounds: &[u64; BUCKET_COUNT], currency: &str) -> Vec<PriceBucket> {
    let mut counts = [0usize; BUCKET_COUNT];
    let threshold = bounds[BOUNDED_BUCKETS];
    for &price in sorted {
        let idx = if price >= threshold {
            BOUNDED_BUCKETS
        } else {
            // bounds[0] is 0, so at least one edge is <= price
            bounds.partition_point(|&edge| edge <= price) - 1
        };
        counts[idx] += 1;
    }

    (0..BUCKET_COUNT)
        .map(|idx| {
            let range_start = bounds[idx];
            let range_end = bounds.get(idx + 1).copied();
            PriceBucket {
                label: range_label(range_start, range_end, currency),
                count: counts[idx],
                range_start,
                range_end,
            }
        })
        .collect()
}
