use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::models::{month_index, FlagStyle, CHECK_MARKS, DASHES};
use crate::parsers::price::{is_price_header, parse_price};
use crate::parsers::table::RawCell;
use crate::scrapers::ImageFetcher;

pub const IMAGE_HEADER: &str = "image";

/// Content of a month cell after symbol mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthMark {
    /// Check-mark, written as `1`.
    Present,
    /// Dash, written as `0`.
    Absent,
    /// Anything else, passed through untouched.
    Other(String),
}

impl MonthMark {
    pub fn from_text(text: &str) -> Self {
        match flag_of(text) {
            Some(true) => MonthMark::Present,
            Some(false) => MonthMark::Absent,
            None => MonthMark::Other(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MonthMark::Present => "1",
            MonthMark::Absent => "0",
            MonthMark::Other(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Month column; the caller folds it into the availability bitmask.
    Month { index: usize, mark: MonthMark },
    /// Name of the downloaded image asset.
    Image(String),
}

/// `Some(true)` for a check-mark, `Some(false)` for a dash.
pub fn flag_of(text: &str) -> Option<bool> {
    let text = text.trim();
    if CHECK_MARKS.contains(&text) {
        Some(true)
    } else if DASHES.contains(&text) {
        Some(false)
    } else {
        None
    }
}

/// Applies the per-column conversion rules to one cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnInterpreter {
    flags: FlagStyle,
}

impl ColumnInterpreter {
    pub fn new(flags: FlagStyle) -> Self {
        Self { flags }
    }

    /// Interpret a cell, downloading its image into `image_dir` for the image column.
    ///
    /// An image column without an `<img>` yields empty text.
    pub async fn interpret(
        &self,
        header: &str,
        cell: &RawCell,
        images: &dyn ImageFetcher,
        image_dir: &Path,
    ) -> Result<TypedValue> {
        if header == IMAGE_HEADER {
            return match &cell.image {
                Some(image) => images.fetch(image, image_dir).await.map(TypedValue::Image),
                None => {
                    warn!("Image column without an image element (cell text: {:?})", cell.max_text());
                    Ok(TypedValue::Text(String::new()))
                }
            };
        }

        Ok(self.interpret_text(header, cell))
    }

    /// Rules for every column that does not need the network.
    pub fn interpret_text(&self, header: &str, cell: &RawCell) -> TypedValue {
        if let Some(index) = month_index(header) {
            return TypedValue::Month {
                index,
                mark: MonthMark::from_text(&cell.max_text()),
            };
        }

        if is_price_header(header) {
            return match parse_price(&cell.texts) {
                Some(amount) => TypedValue::Integer(amount),
                None => {
                    let text = cell.max_text();
                    if !text.is_empty() {
                        warn!("Unparseable {} cell {:?}, keeping text", header, text);
                    }
                    TypedValue::Text(text)
                }
            };
        }

        let text = cell.max_text();
        match (self.flags, flag_of(&text)) {
            (FlagStyle::Boolean, Some(flag)) => TypedValue::Boolean(flag),
            _ => TypedValue::Text(text),
        }
    }
}
