//! Shared fixtures for unit tests
//!
//! Only available when compiled with `cfg(test)`.

use crate::Item;
use std::io::Write;
use tempfile::NamedTempFile;

/// A small mixed result list with ids `s1` to `s8`
#[must_use]
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::new("s1", "Canon AE-1 ジャンク", 800),
        Item::new("s2", "Nikon F3 美品 送料無料", 25_000).with_bids(12),
        Item::new("s3", "Canon EOS Kiss まとめ セット", 3_200).with_bids(4),
        Item::new("s4", "Pentax K1000 新品 未使用", 15_000).with_bids(1),
        Item::new("s5", "Olympus OM-1 junk parts", 1_500).with_bids(6),
        Item::new("s6", "Canon レンズ 50mm", 5_400).with_bids(2),
        Item::new("s7", "Nikon レンズ 中古", 7_800).with_bids(3),
        Item::new("s8", "Minolta X-700 動作未確認", 2_100),
    ]
}

/// One fetched page of `count` items with ids `p{page}-{i}`
#[must_use]
pub fn auction_page(page: u32, count: u32) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let title = match i % 3 {
                0 => format!("Canon lot {i}"),
                1 => format!("Nikon body {i}"),
                _ => format!("Sony lens ジャンク {i}"),
            };
            let price = 1_000 + u64::from(page) * 100 + u64::from(i) * 250;
            Item::new(format!("p{page}-{i}"), title, price).with_bids(i % 4)
        })
        .collect()
}

/// Write `items` as a JSON page to a temporary file
///
/// # Panics
/// Panics if the file cannot be created or written.
#[must_use]
pub fn page_file(items: &[Item]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    let json = serde_json::to_string(items).expect("Failed to serialize items");
    file.write_all(json.as_bytes()).expect("Failed to write temp file");
    file
}
