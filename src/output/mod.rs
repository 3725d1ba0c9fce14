//! Output formatting for CLI display
//!
//! Every writer takes an `io::Write` so the same code serves stdout and
//! tests. Text output is colored through `colored`, which turns itself off
//! when stdout is not a terminal or `NO_COLOR` is set.

use crate::cli::OutputFormat;
use crate::stats::{PriceBucket, Statistics, format_price};
use crate::summary::ActiveFilterEntry;
use crate::taxonomy::{Tag, TagSource};
use crate::{Item, LotsiftError};
use colored::{Color, Colorize};
use serde::Serialize;
use std::io::Write;

/// Width of the longest histogram bar, in cells
pub const BAR_WIDTH: usize = 40;

/// Format one item for the text listing
#[must_use]
pub fn item_line(item: &Item, tags: &[&Tag], currency: &str, quiet: bool) -> String {
    if quiet {
        return item.id.clone();
    }

    let price = item
        .price
        .map_or_else(|| "-".to_string(), |p| format_price(p, currency));
    let mut line = format!(
        "  {:<12} {:>10} {:>4} bids  {}",
        item.id,
        price.yellow(),
        item.bid_count,
        item.title_or_empty()
    );
    if !tags.is_empty() {
        let labels: Vec<String> = tags
            .iter()
            .map(|tag| tag.label.color(style_color(&tag.style)).to_string())
            .collect();
        line.push_str(&format!(" [{}]", labels.join(", ")));
    }
    line
}

/// Terminal color for a tag style such as `tag-red`
#[must_use]
pub fn style_color(style: &str) -> Color {
    match style.strip_prefix("tag-").unwrap_or(style) {
        "red" => Color::Red,
        "green" => Color::Green,
        "teal" | "cyan" => Color::Cyan,
        "blue" => Color::Blue,
        "purple" | "magenta" => Color::Magenta,
        "orange" | "yellow" => Color::Yellow,
        "gray" | "grey" => Color::BrightBlack,
        _ => Color::White,
    }
}

/// Format an active-filter badge
#[must_use]
pub fn badge(entry: &ActiveFilterEntry) -> String {
    let text = format!("[{}]", entry.label);
    match entry.filter.kind() {
        "include" => text.green().to_string(),
        "exclude" => text.red().to_string(),
        "tag" => text.magenta().to_string(),
        "band" => text.yellow().to_string(),
        "flag" => text.cyan().to_string(),
        _ => text.bold().to_string(),
    }
}

/// Bar for one bucket, scaled so `max_count` fills `width`
#[must_use]
pub fn histogram_bar(bucket: &PriceBucket, max_count: usize, width: usize) -> String {
    if max_count == 0 || bucket.count == 0 {
        return String::new();
    }
    // Non-empty buckets always get at least one cell
    let cells = (bucket.count * width).div_ceil(max_count).max(1);
    "█".repeat(cells)
}

#[derive(Serialize)]
struct ItemRow<'a> {
    #[serde(flatten)]
    item: &'a Item,
    tags: Vec<&'a str>,
}

/// Write the view list
///
/// # Errors
///
/// Returns an error if writing or serializing fails.
pub fn write_items<W, T>(
    out: &mut W,
    items: &[Item],
    tags: &T,
    currency: &str,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), LotsiftError>
where
    W: Write,
    T: TagSource + ?Sized,
{
    match format {
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", item_line(item, &tags.tags_for(item), currency, quiet))?;
            }
        }
        OutputFormat::Json => {
            let rows: Vec<ItemRow<'_>> = items
                .iter()
                .map(|item| ItemRow {
                    item,
                    tags: tags.tags_for(item).iter().map(|t| t.keyword.as_str()).collect(),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["id", "title", "price", "bid_count", "end_time", "tags"])?;
            for item in items {
                let keywords: Vec<&str> = tags.tags_for(item).iter().map(|t| t.keyword.as_str()).collect();
                let price = item.price.map(|p| p.to_string()).unwrap_or_default();
                let bids = item.bid_count.to_string();
                let keywords = keywords.join(";");
                writer.write_record([
                    item.id.as_str(),
                    item.title_or_empty(),
                    price.as_str(),
                    bids.as_str(),
                    item.end_time.as_str(),
                    keywords.as_str(),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsReport<'a> {
    baseline: Option<&'a Statistics>,
    filtered: Option<&'a Statistics>,
    active_filters: &'a [ActiveFilterEntry],
}

/// One-line summary of a statistics block
#[must_use]
pub fn stats_line(name: &str, stats: Option<&Statistics>, currency: &str) -> String {
    let Some(stats) = stats else {
        return format!("{name}: no priced items");
    };
    format!(
        "{name}: {} items, min {}, median {}, mean {}, max {}",
        stats.count,
        format_price(stats.min, currency),
        format_price(stats.median.round() as u64, currency),
        format_price(stats.mean.round() as u64, currency),
        format_price(stats.max, currency),
    )
}

/// Write baseline and filtered statistics
///
/// The histogram shown in text mode is the filtered one, which equals the
/// baseline when no filter is active.
///
/// # Errors
///
/// Returns an error if writing or serializing fails.
pub fn write_stats<W: Write>(
    out: &mut W,
    baseline: Option<&Statistics>,
    filtered: Option<&Statistics>,
    active: &[ActiveFilterEntry],
    currency: &str,
    format: OutputFormat,
) -> Result<(), LotsiftError> {
    match format {
        OutputFormat::Text => {
            if !active.is_empty() {
                let badges: Vec<String> = active.iter().map(badge).collect();
                writeln!(out, "{}", badges.join(" "))?;
            }
            writeln!(out, "{}", stats_line("all", baseline, currency))?;
            writeln!(out, "{}", stats_line("filtered", filtered, currency).bold())?;

            if let Some(stats) = filtered {
                let max_count = stats.buckets.iter().map(|b| b.count).max().unwrap_or(0);
                let label_width = stats.buckets.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
                writeln!(out)?;
                for bucket in &stats.buckets {
                    let pad = label_width.saturating_sub(bucket.label.chars().count());
                    writeln!(
                        out,
                        "  {}{} {:>5} {}",
                        " ".repeat(pad),
                        bucket.label,
                        bucket.count,
                        histogram_bar(bucket, max_count, BAR_WIDTH).green()
                    )?;
                }
            }
        }
        OutputFormat::Json => {
            let report = StatsReport {
                baseline,
                filtered,
                active_filters: active,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["set", "label", "range_start", "range_end", "count"])?;
            for (set, stats) in [("baseline", baseline), ("filtered", filtered)] {
                let Some(stats) = stats else { continue };
                for bucket in &stats.buckets {
                    let start = bucket.range_start.to_string();
                    let end = bucket.range_end.map(|e| e.to_string()).unwrap_or_default();
                    let count = bucket.count.to_string();
                    writer.write_record([set, bucket.label.as_str(), start.as_str(), end.as_str(), count.as_str()])?;
                }
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Write tags with how many items carry each
///
/// # Errors
///
/// Returns an error if writing or serializing fails.
pub fn write_tag_counts<W: Write>(
    out: &mut W,
    counts: &[(&Tag, usize)],
    format: OutputFormat,
    quiet: bool,
) -> Result<(), LotsiftError> {
    match format {
        OutputFormat::Text => {
            for (tag, count) in counts {
                if quiet {
                    writeln!(out, "{}", tag.keyword)?;
                } else {
                    writeln!(
                        out,
                        "  {} {} ({}) {count}",
                        tag.keyword,
                        tag.label.color(style_color(&tag.style)),
                        tag.group.as_str()
                    )?;
                }
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Row<'a> {
                #[serde(flatten)]
                tag: &'a Tag,
                count: usize,
            }
            let rows: Vec<Row<'_>> = counts.iter().map(|&(tag, count)| Row { tag, count }).collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["keyword", "label", "group", "count"])?;
            for (tag, count) in counts {
                let count = count.to_string();
                writer.write_record([
                    tag.keyword.as_str(),
                    tag.label.as_str(),
                    tag.group.as_str(),
                    count.as_str(),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterState;
    use crate::selection::SelectionState;
    use crate::stats::summarize;
    use crate::summary::summarize as summarize_filters;
    use crate::taxonomy::{TagExtractor, Taxonomy};
    use crate::testing::sample_items;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), LotsiftError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_item_line_quiet_is_id() {
        let item = Item::new("x1", "Canon", 1200);
        assert_eq!(item_line(&item, &[], "¥", true), "x1");
    }

    #[test]
    fn test_item_line_shows_price_and_title() {
        let item = Item::new("x1", "Canon AE-1", 12_000).with_bids(3);
        let line = item_line(&item, &[], "¥", false);
        assert!(line.contains("¥12,000"));
        assert!(line.contains("3 bids"));
        assert!(line.contains("Canon AE-1"));
    }

    #[test]
    fn test_item_line_missing_price() {
        let item = Item {
            price: None,
            ..Item::new("x1", "Canon", 0)
        };
        let line = item_line(&item, &[], "¥", false);
        assert!(line.contains('-'));
        assert!(!line.contains('¥'));
    }

    #[test]
    fn test_style_color() {
        assert_eq!(style_color("tag-red"), Color::Red);
        assert_eq!(style_color("teal"), Color::Cyan);
        assert_eq!(style_color("tag-gray"), Color::BrightBlack);
        assert_eq!(style_color("sparkly"), Color::White);
    }

    #[test]
    fn test_histogram_bar_scaling() {
        let bucket = |count| PriceBucket {
            label: String::new(),
            count,
            range_start: 0,
            range_end: None,
        };
        assert_eq!(histogram_bar(&bucket(10), 10, 40).chars().count(), 40);
        assert_eq!(histogram_bar(&bucket(5), 10, 40).chars().count(), 20);
        assert_eq!(histogram_bar(&bucket(1), 1000, 40).chars().count(), 1);
        assert!(histogram_bar(&bucket(0), 10, 40).is_empty());
    }

    #[test]
    fn test_items_json_has_tags() {
        let items = sample_items();
        let out = render(|buf| {
            write_items(buf, &items[..1], &TagExtractor::default(), "¥", OutputFormat::Json, false)
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["id"], "s1");
        assert_eq!(value[0]["tags"][0], "ジャンク");
    }

    #[test]
    fn test_items_csv_rows() {
        let items = sample_items();
        let out = render(|buf| {
            write_items(buf, &items, &TagExtractor::default(), "¥", OutputFormat::Csv, false)
        });
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), items.len());
        assert_eq!(&rows[0][0], "s1");
        assert_eq!(&rows[0][2], "800");
    }

    #[test]
    fn test_stats_text_lists_every_bucket() {
        let stats = summarize(&sample_items()).unwrap();
        let out = render(|buf| write_stats(buf, Some(&stats), Some(&stats), &[], "¥", OutputFormat::Text));
        for bucket in &stats.buckets {
            assert!(out.contains(&bucket.label));
        }
        assert!(out.contains("8 items"));
    }

    #[test]
    fn test_stats_json_reports_both_sets() {
        let items = sample_items();
        let baseline = summarize(&items).unwrap();
        let filtered = summarize(&items[..3]).unwrap();
        let mut filter = FilterState::new();
        filter.add_include_keyword("canon");
        let active = summarize_filters(&filter, &SelectionState::new());

        let out = render(|buf| {
            write_stats(buf, Some(&baseline), Some(&filtered), &active, "¥", OutputFormat::Json)
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["baseline"]["count"], 8);
        assert_eq!(value["filtered"]["count"], 3);
        assert_eq!(value["active_filters"][0]["key"], "include:canon");
    }

    #[test]
    fn test_stats_without_prices() {
        let out = render(|buf| write_stats(buf, None, None, &[], "¥", OutputFormat::Text));
        assert!(out.contains("no priced items"));
    }

    #[test]
    fn test_tag_counts_csv() {
        let taxonomy = Taxonomy::default();
        let counts: Vec<(&Tag, usize)> = taxonomy.tags.iter().map(|t| (t, 0)).collect();
        let out = render(|buf| write_tag_counts(buf, &counts, OutputFormat::Csv, false));
        assert_eq!(out.lines().count(), taxonomy.len() + 1);
    }
}
