pub mod availability;
pub mod namespace;
pub mod record;

pub use availability::*;
pub use namespace::*;
pub use record::*;

// Element names used in the record files
pub const RECORD_LIST_TAG: &str = "RecordList";
pub const RECORD_TAG: &str = "Record";
pub const UID_TAG: &str = "id";
pub const AVAILABILITY_TAG: &str = "availability";

// Cell symbols used by the wiki tables
pub const CHECK_MARKS: &[&str] = &["✓", "✔"];
pub const DASHES: &[&str] = &["-", "–", "—", "✗"];
