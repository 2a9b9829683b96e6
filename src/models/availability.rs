use serde::{Deserialize, Serialize};
use std::fmt;

pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Index of a month header (`jan`, `january`, `sept`, ...), if it is one.
pub fn month_index(header: &str) -> Option<usize> {
    let header = header.trim().trim_end_matches('.');
    if header == "sept" {
        return Some(8);
    }
    MONTHS
        .iter()
        .position(|m| *m == header)
        .or_else(|| MONTH_NAMES.iter().position(|m| *m == header))
}

/// Month-presence indicator, rendered as 12 characters of '0'/'1'.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Availability([bool; 12]);

impl Availability {
    pub fn set(&mut self, index: usize, present: bool) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = present;
        }
    }

    pub fn is_default(&self) -> bool {
        self.0.iter().all(|m| !m)
    }

    pub fn to_bitmask(&self) -> String {
        self.0.iter().map(|m| if *m { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bitmask())
    }
}

/// Whether a record carries the availability field when no month is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    #[default]
    WhenSet,
    Always,
}

impl AvailabilityPolicy {
    pub fn attach(&self, availability: &Availability) -> bool {
        match self {
            AvailabilityPolicy::WhenSet => !availability.is_default(),
            AvailabilityPolicy::Always => true,
        }
    }
}
