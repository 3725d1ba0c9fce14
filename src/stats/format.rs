//! Currency formatting for labels

/// Currency symbol used when none is configured
pub const DEFAULT_CURRENCY: &str = "¥";

/// Format a whole-unit price with thousands separators, e.g. `¥12,345`
#[must_use]
pub fn format_price(amount: u64, symbol: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{symbol}{grouped}")
}

/// Label for a `[min, max)` range, or `min+` when unbounded
#[must_use]
pub fn range_label(min: u64, max: Option<u64>, symbol: &str) -> String {
    match max {
        Some(max) => format!("{} - {}", format_price(min, symbol), format_price(max, symbol)),
        None => format!("{}+", format_price(min, symbol)),
    }
}
