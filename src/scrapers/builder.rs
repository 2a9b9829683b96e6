use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::models::{
    Availability, AvailabilityPolicy, FieldValue, Record, RecordList, AVAILABILITY_TAG,
};
use crate::parsers::MonthMark;

/// Fold one month cell into the row's bitmask. Values other than a
/// check-mark or dash leave the month at its default.
pub fn fold_month(availability: &mut Availability, index: usize, mark: &MonthMark) {
    match mark {
        MonthMark::Present => availability.set(index, true),
        MonthMark::Absent => availability.set(index, false),
        MonthMark::Other(text) => {
            if !text.is_empty() {
                debug!("Ignoring month cell {:?} at index {}", text, index);
            }
        }
    }
}

/// Accumulates records in row order, numbering them `offset + 1`, `offset + 2`, ...
#[derive(Debug)]
pub struct RecordListBuilder {
    offset: u32,
    counter: u32,
    policy: AvailabilityPolicy,
    records: Vec<Record>,
}

impl RecordListBuilder {
    pub fn new(offset: u32, policy: AvailabilityPolicy) -> Self {
        Self {
            offset,
            counter: 0,
            policy,
            records: Vec::new(),
        }
    }

    /// Append one row and return the id it was given.
    ///
    /// Fails when `offset + row` no longer fits an id.
    pub fn push(&mut self, mut fields: Vec<(String, FieldValue)>, availability: Availability) -> Result<u32> {
        let counter = self.counter + 1;
        let id = self.offset.checked_add(counter).ok_or_else(|| {
            ScrapeError::Config(format!(
                "uid_offset {} leaves no id for row {}",
                self.offset, counter
            ))
        })?;
        self.counter = counter;

        if self.policy.attach(&availability) {
            fields.push((AVAILABILITY_TAG.to_string(), FieldValue::Bitmask(availability)));
        }

        self.records.push(Record::new(id, fields));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> RecordList {
        RecordList::new(self.records)
    }
}
