pub mod column;
pub mod price;
pub mod sanitize;
pub mod table;

pub use column::*;
pub use price::*;
pub use sanitize::*;
pub use table::*;

use html_escape::decode_html_entities;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Positional header name: trimmed, lower-cased cell text.
pub fn header_name(cell: &RawCell) -> String {
    cell.full_text().to_lowercase()
}
