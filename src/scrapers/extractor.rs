use std::path::Path;
use tracing::{debug, warn};

use crate::config::ResourceDescriptor;
use crate::error::{Result, ScrapeError};
use crate::models::{
    Availability, AvailabilityPolicy, FieldValue, RecordList, AVAILABILITY_TAG, UID_TAG,
};
use crate::parsers::{header_name, ColumnInterpreter, RawRow, Sanitizer, TypedValue};
use crate::scrapers::builder::{fold_month, RecordListBuilder};
use crate::scrapers::ImageFetcher;

enum ExtractState {
    ExpectHeader,
    ReadingBody(Vec<String>),
    Done,
}

/// Turns the rows of a located table into a record list.
///
/// The first row names the columns. Any later row holding a `<th>` is a
/// repeated header and is skipped without using up an id. Cells are paired
/// with headers by position: cells past the last header are ignored, and
/// headers past the last cell leave that field out of the record.
pub struct TableExtractor<'a> {
    interpreter: ColumnInterpreter,
    sanitizer: &'a Sanitizer,
    images: &'a dyn ImageFetcher,
    image_dir: &'a Path,
    offset: u32,
    policy: AvailabilityPolicy,
}

impl<'a> TableExtractor<'a> {
    pub fn new(
        descriptor: &ResourceDescriptor,
        sanitizer: &'a Sanitizer,
        images: &'a dyn ImageFetcher,
        image_dir: &'a Path,
    ) -> Self {
        Self {
            interpreter: ColumnInterpreter::new(descriptor.flags),
            sanitizer,
            images,
            image_dir,
            offset: descriptor.uid_offset,
            policy: descriptor.availability,
        }
    }

    pub async fn extract(&self, rows: Vec<RawRow>) -> Result<RecordList> {
        let mut rows = rows.into_iter();
        let mut builder = RecordListBuilder::new(self.offset, self.policy);
        let mut state = ExtractState::ExpectHeader;

        loop {
            state = match state {
                ExtractState::ExpectHeader => {
                    let row = rows
                        .next()
                        .ok_or_else(|| ScrapeError::Parse("table has no header row".to_string()))?;
                    let headers: Vec<String> = row.cells.iter().map(header_name).collect();
                    if headers.is_empty() {
                        return Err(ScrapeError::Parse("header row has no cells".to_string()));
                    }
                    debug!("Columns: {:?}", headers);
                    ExtractState::ReadingBody(headers)
                }
                ExtractState::ReadingBody(headers) => match rows.next() {
                    None => ExtractState::Done,
                    Some(row) if row.has_header_cell() => {
                        debug!("Skipping interleaved header row");
                        ExtractState::ReadingBody(headers)
                    }
                    Some(row) => {
                        self.read_row(&headers, &row, &mut builder).await?;
                        ExtractState::ReadingBody(headers)
                    }
                },
                ExtractState::Done => break,
            };
        }

        Ok(builder.finish())
    }

    async fn read_row(&self, headers: &[String], row: &RawRow, builder: &mut RecordListBuilder) -> Result<()> {
        let width = headers.len().min(row.cells.len());
        let mut fields = Vec::with_capacity(width);
        let mut availability = Availability::default();

        for (header, cell) in headers[..width].iter().zip(&row.cells[..width]) {
            let value = self
                .interpreter
                .interpret(header, cell, self.images, self.image_dir)
                .await?;

            let value = match value {
                TypedValue::Month { index, mark } => {
                    fold_month(&mut availability, index, &mark);
                    continue;
                }
                TypedValue::Text(text) | TypedValue::Image(text) => FieldValue::Text(text),
                TypedValue::Integer(n) => FieldValue::Integer(n),
                TypedValue::Boolean(b) => FieldValue::Boolean(b),
            };

            let name = field_name(self.sanitizer, header);
            if name.is_empty() {
                warn!("Dropping cell under unnamed column");
                continue;
            }
            fields.push((name, value));
        }

        builder.push(fields, availability)?;
        Ok(())
    }
}

/// Element name for a column. The builder owns `id` and `availability`,
/// and an element name cannot start with a digit or `.`, so those get a
/// leading `_`.
fn field_name(sanitizer: &Sanitizer, header: &str) -> String {
    let mut name = sanitizer.sanitize(header);
    let bad_start = name
        .chars()
        .next()
        .map(|c| !(c.is_alphabetic() || c == '_'))
        .unwrap_or(false);
    if bad_start || name == UID_TAG || name == AVAILABILITY_TAG {
        name.insert(0, '_');
    }
    name
}
