use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$")
        .expect("Invalid digits regex")
});

static THOUSANDS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}(?:[,.]\d{3})+$|^\d+$")
        .expect("Invalid thousands regex")
});

/// Headers whose cells hold a currency amount.
pub const PRICE_HEADERS: &[&str] = &["price", "sell price", "selling price", "sell", "value"];

pub fn is_price_header(header: &str) -> bool {
    PRICE_HEADERS.contains(&header)
}

/// Parse a price cell such as `1,200 Bells` from its text nodes.
///
/// The last non-empty node is tried first; cells that put the caption after
/// the amount fall back to the earlier nodes.
pub fn parse_price<S: AsRef<str>>(texts: &[S]) -> Option<i64> {
    texts
        .iter()
        .rev()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .find_map(parse_price_text)
}

/// Parse one text node: purely numeric as-is, otherwise the first token
/// with thousands separators stripped.
pub fn parse_price_text(text: &str) -> Option<i64> {
    let text = text.trim();
    if DIGITS_REGEX.is_match(text) {
        return text.parse().ok();
    }

    let token = text.split_whitespace().next()?;
    if !THOUSANDS_REGEX.is_match(token) {
        return None;
    }
    token.replace([',', '.'], "").parse().ok()
}
