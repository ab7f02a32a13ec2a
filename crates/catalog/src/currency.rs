//! Currency helpers.
//!
//! Seed prices are quoted in USD; the catalog stores INR. Conversion uses a
//! fixed factor and keeps two decimal places.

/// Fixed USD -> INR conversion factor applied to seed prices.
pub const USD_TO_INR: f64 = 75.0;

/// Parse a textual price such as `"$1,299.00"`.
///
/// Every character other than ASCII digits and `.` is stripped first.
/// Returns `None` when nothing numeric remains or the remainder does not
/// parse (e.g. `"1.2.3"`).
pub fn parse_price_text(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Convert a USD amount to INR, rounded to two decimals.
pub fn usd_to_inr(usd: f64) -> f64 {
    round_cents(usd * USD_TO_INR)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an INR amount for display, e.g. `₹12,34,567.50`.
///
/// Uses Indian digit grouping: the last three integer digits, then groups of two.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    format!("{sign}₹{}.{:02}", group_indian(&digits), cents % 100)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
