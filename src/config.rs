use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrapeError};
use crate::models::{AvailabilityPolicy, FlagStyle};

/// Run-wide settings. Every field has a default so a config file only needs
/// to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    pub resources_path: PathBuf,
    pub output_dir: PathBuf,
    pub timeout_seconds: u64,
    pub page_retry: RetryPolicy,
    pub image_retry: RetryPolicy,
    pub reserved_keywords: Vec<String>,
    pub translatable_fields: TranslatableFields,
    pub translator: TranslatorSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
        }
    }
}

/// Field names whose text is replaced by a translation key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatableFields {
    pub specific: Vec<String>,
    pub generic: Vec<String>,
}

impl Default for TranslatableFields {
    fn default() -> Self {
        Self {
            specific: vec!["name".to_string()],
            generic: vec!["location".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    pub api_base_url: String,
    pub categories: Vec<String>,
    pub locales: Vec<LocaleMapping>,
}

/// Maps the data source's language code to the ISO code used for the
/// output directory (`sp` is served as `name-sp` but written to `values-es-rES`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMapping {
    pub source: String,
    pub iso: String,
}

impl LocaleMapping {
    pub fn new(source: &str, iso: &str) -> Self {
        Self {
            source: source.to_string(),
            iso: iso.to_string(),
        }
    }

    pub fn values_dir_name(&self) -> String {
        format!("values-{}-r{}", self.iso.to_lowercase(), self.iso.to_uppercase())
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://acnhapi.com/".to_string(),
            categories: vec!["fish".to_string(), "bugs".to_string(), "fossils".to_string()],
            locales: vec![
                LocaleMapping::new("sp", "es"),
                LocaleMapping::new("de", "de"),
                LocaleMapping::new("fr", "fr"),
                LocaleMapping::new("it", "it"),
                LocaleMapping::new("nl", "nl"),
            ],
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://animalcrossing.fandom.com/wiki/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            resources_path: PathBuf::from("resources.json"),
            output_dir: PathBuf::from("."),
            timeout_seconds: 25,
            page_retry: RetryPolicy::default(),
            image_retry: RetryPolicy::once(),
            reserved_keywords: vec!["char".to_string()],
            translatable_fields: TranslatableFields::default(),
            translator: TranslatorSettings::default(),
        }
    }
}

impl Settings {
    /// Layers an optional config file and `WIKI_SCRAPE__*` environment
    /// variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = config::Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name("wiki_scrape").required(false)),
        };

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix("WIKI_SCRAPE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if settings.page_retry.max_attempts == 0 || settings.image_retry.max_attempts == 0 {
            return Err(ScrapeError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }
}

/// One scrapeable table on the wiki.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub endpoint: String,
    /// CSS selector matching the table element(s) holding the data.
    #[serde(alias = "table_locator")]
    pub table_selector: String,
    #[serde(default)]
    pub uid_offset: u32,
    #[serde(default)]
    pub availability: AvailabilityPolicy,
    #[serde(default)]
    pub flags: FlagStyle,
}

/// game -> resource name -> descriptor
pub type Resources = BTreeMap<String, BTreeMap<String, ResourceDescriptor>>;

pub fn load_resources(path: &Path) -> Result<Resources> {
    let content = std::fs::read_to_string(path).map_err(|e| ScrapeError::fs(path, e))?;
    parse_resources(&content)
}

pub fn parse_resources(json: &str) -> Result<Resources> {
    serde_json::from_str(json).map_err(|e| ScrapeError::Config(format!("resources: {}", e)))
}
