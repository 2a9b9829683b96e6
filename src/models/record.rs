use serde::{Deserialize, Serialize};
use std::fmt;

use super::Availability;

/// How check-mark/dash cells are written outside month columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagStyle {
    /// Kept as cell text; month columns fold into the availability bitmask.
    #[default]
    Bitmask,
    /// Converted to explicit `true`/`false`.
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Bitmask(Availability),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Bitmask(a) => write!(f, "{}", a),
        }
    }
}

/// One table row. Fields keep column order; the id is not part of `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: u32,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(id: u32, fields: Vec<(String, FieldValue)>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Builds a new record with every text field passed through `f`.
    /// Non-text fields and the id are carried over unchanged.
    pub fn map_text<F>(&self, mut f: F) -> Record
    where
        F: FnMut(&str, &str) -> String,
    {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::Text(text) => FieldValue::Text(f(name, text)),
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();

        Record::new(self.id, fields)
    }
}

/// Records of one resource, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.records.iter().map(Record::id).collect()
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for RecordList {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
