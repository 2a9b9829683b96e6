use serde::{Deserialize, Serialize};
use std::fmt;

/// Edition suffixes that share a translation namespace with the base resource.
const EDITION_SUFFIXES: &[&str] = &["_nh", "_sh"];

const STRINGS_SUFFIX: &str = "_strings";
const GENERIC_STEM: &str = "strings";

/// Translation grouping boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Namespace {
    /// Terms specific to one resource family, e.g. fish names.
    Resource(String),
    /// Terms shared by every resource, e.g. location names.
    Generic,
}

impl Namespace {
    /// `fish_nh` and `fish_sh` both translate into the `fish` namespace.
    pub fn for_resource(resource: &str) -> Self {
        let base = EDITION_SUFFIXES
            .iter()
            .find_map(|s| resource.strip_suffix(s))
            .filter(|base| !base.is_empty())
            .unwrap_or(resource);
        Namespace::Resource(base.to_string())
    }

    pub fn file_stem(&self) -> String {
        match self {
            Namespace::Resource(name) => format!("{}{}", name, STRINGS_SUFFIX),
            Namespace::Generic => GENERIC_STEM.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.xml", self.file_stem())
    }

    pub fn from_file_stem(stem: &str) -> Option<Self> {
        if stem == GENERIC_STEM {
            return Some(Namespace::Generic);
        }
        stem.strip_suffix(STRINGS_SUFFIX)
            .filter(|name| !name.is_empty())
            .map(|name| Namespace::Resource(name.to_string()))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Resource(name) => write!(f, "{}", name),
            Namespace::Generic => write!(f, "generic"),
        }
    }
}

/// Which translatable-field set a term extraction pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Specific,
    Generic,
}
