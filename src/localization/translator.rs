use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{LocaleMapping, RetryPolicy, TranslatorSettings};
use crate::error::{Result, ScrapeError};
use crate::localization::Term;
use crate::models::Namespace;
use crate::storage::Storage;
use crate::utils::http::fetch_with_retry;

/// One item of the translation data source, e.g. a fish with its names
/// keyed `name-en`, `name-de`, ...
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslationItem {
    #[serde(rename = "file-name", default)]
    pub file_name: String,
    #[serde(default)]
    pub name: HashMap<String, String>,
}

impl TranslationItem {
    pub fn name_in(&self, language: &str) -> Option<&str> {
        self.name.get(&format!("name-{}", language)).map(String::as_str)
    }

    /// Matches on the file name or, failing that, the English name.
    pub fn matches(&self, term: &Term) -> bool {
        (!self.file_name.is_empty() && self.file_name == term.key)
            || self
                .name_in("en")
                .map(|en| en.to_lowercase() == term.text.to_lowercase())
                .unwrap_or(false)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsPayload {
    Keyed(BTreeMap<String, TranslationItem>),
    List(Vec<TranslationItem>),
}

#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn items(&self, category: &str) -> Result<Vec<TranslationItem>>;
}

/// JSON API serving `<base>/<category>`.
pub struct HttpTranslationSource {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTranslationSource {
    pub fn new(client: Client, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            retry,
        }
    }
}

#[async_trait]
impl TranslationSource for HttpTranslationSource {
    async fn items(&self, category: &str) -> Result<Vec<TranslationItem>> {
        let url = format!("{}{}", self.base_url, category);
        let response = fetch_with_retry(&self.client, &url, self.retry).await?;
        let payload: ItemsPayload = response
            .json()
            .await
            .map_err(|e| ScrapeError::transport(&url, e))?;

        Ok(match payload {
            ItemsPayload::Keyed(map) => map.into_values().collect(),
            ItemsPayload::List(list) => list,
        })
    }
}

/// Per-locale translations of one namespace, keyed by ISO code.
pub type LocaleTerms = BTreeMap<String, Vec<Term>>;

/// Look up every term in `items`; a match yields one entry per locale that
/// the item has a name for.
pub fn translate_terms(terms: &[Term], items: &[TranslationItem], locales: &[LocaleMapping]) -> LocaleTerms {
    let mut out: LocaleTerms = locales.iter().map(|l| (l.iso.clone(), Vec::new())).collect();

    for term in terms {
        let Some(item) = items.iter().find(|item| item.matches(term)) else {
            continue;
        };
        for locale in locales {
            if let Some(name) = item.name_in(&locale.source) {
                if let Some(entries) = out.get_mut(&locale.iso) {
                    entries.push(Term::new(term.key.clone(), name));
                }
            }
        }
    }

    out
}

#[derive(Debug, Default)]
pub struct TranslationSummary {
    pub namespaces: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub written: Vec<PathBuf>,
}

/// Reads `values/*_strings.xml` and writes `values-<iso>-r<ISO>/` resources.
pub struct Translator<'a> {
    source: &'a dyn TranslationSource,
    storage: &'a dyn Storage,
    settings: &'a TranslatorSettings,
}

impl<'a> Translator<'a> {
    pub fn new(source: &'a dyn TranslationSource, storage: &'a dyn Storage, settings: &'a TranslatorSettings) -> Self {
        Self {
            source,
            storage,
            settings,
        }
    }

    pub async fn run(&self, values_dir: &Path, output_dir: &Path) -> Result<TranslationSummary> {
        let mut summary = TranslationSummary::default();
        let mut cache: HashMap<String, Vec<TranslationItem>> = HashMap::new();

        for (namespace, terms) in self.storage.read_values(values_dir).await? {
            let Namespace::Resource(category) = &namespace else {
                continue;
            };
            if !self.settings.categories.contains(category) {
                continue;
            }

            if !cache.contains_key(category) {
                info!("Fetching translations for {}", category);
                let items = self.source.items(category).await?;
                cache.insert(category.clone(), items);
            }
            let items = &cache[category];

            let translated = translate_terms(&terms, items, &self.settings.locales);
            let matched = terms
                .iter()
                .filter(|t| items.iter().any(|item| item.matches(t)))
                .count();
            if matched < terms.len() {
                warn!("{}: {} of {} terms have no translation", category, terms.len() - matched, terms.len());
            }
            summary.matched += matched;
            summary.unmatched += terms.len() - matched;
            summary.namespaces += 1;

            for locale in &self.settings.locales {
                let dir = output_dir.join(locale.values_dir_name());
                let entries = translated.get(&locale.iso).map(Vec::as_slice).unwrap_or_default();
                let path = self.storage.write_strings(&dir, &namespace, entries).await?;
                summary.written.push(path);
            }
        }

        Ok(summary)
    }
}
