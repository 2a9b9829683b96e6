use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{ResourceDescriptor, Resources};
use crate::error::{Result, ScrapeError};
use crate::localization::{LocalizationIndex, TermExtractor};
use crate::models::{Namespace, TermCategory};
use crate::scrapers::TableScraper;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub game: String,
    pub resource: String,
    pub records: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub game: String,
    pub resource: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<ResourceOutcome>,
    pub failed: Vec<ResourceFailure>,
    pub string_files: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives fetch → extract → term extraction → write for every resource, one
/// at a time. A failing resource is logged and recorded; the batch continues.
pub struct Runner<'a> {
    scraper: &'a dyn TableScraper,
    storage: &'a dyn Storage,
    terms: &'a TermExtractor,
}

impl<'a> Runner<'a> {
    pub fn new(scraper: &'a dyn TableScraper, storage: &'a dyn Storage, terms: &'a TermExtractor) -> Self {
        Self {
            scraper,
            storage,
            terms,
        }
    }

    /// Process `resources` (optionally just one game), then write the string files.
    pub async fn run(
        &self,
        resources: &Resources,
        only_game: Option<&str>,
        index: &mut LocalizationIndex,
    ) -> Result<RunSummary> {
        info!("--- Starting run at {} ---", Local::now().format("%Y-%m-%d %H:%M:%S"));
        if let Some(game) = only_game {
            if !resources.contains_key(game) {
                let known: Vec<&str> = resources.keys().map(String::as_str).collect();
                return Err(ScrapeError::Config(format!(
                    "unknown game '{}' (resources define: {})",
                    game,
                    known.join(", ")
                )));
            }
        }
        let mut summary = RunSummary::default();

        for (game, game_resources) in resources {
            if only_game.map(|g| g != game).unwrap_or(false) {
                continue;
            }
            info!("Processing game: {}", game.to_uppercase());

            let image_dir = match self.storage.prepare_game(game).await {
                Ok(dir) => dir,
                Err(e) => {
                    error!("Cannot prepare output for {}: {}", game, e);
                    for resource in game_resources.keys() {
                        summary.failed.push(ResourceFailure {
                            game: game.clone(),
                            resource: resource.clone(),
                            error: e.to_string(),
                        });
                    }
                    continue;
                }
            };

            for (resource, descriptor) in game_resources {
                match self.process(game, resource, descriptor, &image_dir, index).await {
                    Ok(outcome) => summary.succeeded.push(outcome),
                    Err(e) => {
                        error!("Failed to process {}/{}: {}", game, resource, e);
                        summary.failed.push(ResourceFailure {
                            game: game.clone(),
                            resource: resource.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        summary.string_files = self.storage.write_index(index).await?;

        info!(
            "Run completed: {} resources written, {} failed, {} translation keys",
            summary.succeeded.len(),
            summary.failed.len(),
            index.key_count()
        );
        Ok(summary)
    }

    async fn process(
        &self,
        game: &str,
        resource: &str,
        descriptor: &ResourceDescriptor,
        image_dir: &Path,
        index: &mut LocalizationIndex,
    ) -> Result<ResourceOutcome> {
        let records = self.scraper.scrape(resource, descriptor, image_dir).await?;
        info!("Extracted {} records for {}/{}", records.len(), game, resource);

        // Keys only reach the index once the record file referencing them exists.
        let mut staged = index.clone();
        let records = self.terms.extract(
            &records,
            &mut staged,
            &Namespace::for_resource(resource),
            TermCategory::Specific,
        );
        let records = self
            .terms
            .extract(&records, &mut staged, &Namespace::Generic, TermCategory::Generic);

        let path = self.storage.write_records(game, resource, &records).await?;
        *index = staged;
        Ok(ResourceOutcome {
            game: game.to_string(),
            resource: resource.to_string(),
            records: records.len(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_resources;
    use crate::localization::Term;
    use crate::models::{FieldValue, Record, RecordList};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct CannedScraper;

    #[async_trait]
    impl TableScraper for CannedScraper {
        async fn scrape(&self, name: &str, _descriptor: &ResourceDescriptor, _image_dir: &Path) -> Result<RecordList> {
            Ok(RecordList::new(vec![Record::new(
                1,
                vec![
                    ("name".into(), FieldValue::text(format!("{} Item", name))),
                    ("location".into(), FieldValue::text("Pond")),
                ],
            )]))
        }
    }

    /// Keeps written record lists in memory; `broken` resources fail to write.
    #[derive(Default)]
    struct MemoryStorage {
        written: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn prepare_game(&self, game: &str) -> Result<PathBuf> {
            Ok(PathBuf::from("images").join(game))
        }

        async fn write_records(&self, game: &str, resource: &str, _records: &RecordList) -> Result<PathBuf> {
            let path = PathBuf::from("data").join(game).join(format!("{}.xml", resource));
            if resource.starts_with("broken") {
                return Err(ScrapeError::fs(
                    &path,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                ));
            }
            self.written.lock().unwrap().push(resource.to_string());
            Ok(path)
        }

        async fn load_index(&self) -> Result<LocalizationIndex> {
            Ok(LocalizationIndex::new())
        }

        async fn write_index(&self, _index: &LocalizationIndex) -> Result<Vec<PathBuf>> {
            Ok(Vec::new())
        }

        async fn read_values(&self, _dir: &Path) -> Result<Vec<(Namespace, Vec<Term>)>> {
            Ok(Vec::new())
        }

        async fn write_strings(&self, dir: &Path, namespace: &Namespace, _terms: &[Term]) -> Result<PathBuf> {
            Ok(dir.join(namespace.file_name()))
        }
    }

    fn resources() -> Resources {
        parse_resources(
            r#"{
                "nh": {
                    "broken_nh": {"endpoint": "Broken", "table_selector": "table"},
                    "fish_nh": {"endpoint": "Fish", "table_selector": "table"}
                },
                "nl": {
                    "bugs_nl": {"endpoint": "Bugs", "table_selector": "table"}
                }
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failed_write_leaves_index_untouched() {
        let storage = MemoryStorage::default();
        let terms = TermExtractor::default();
        let mut index = LocalizationIndex::new();

        let summary = Runner::new(&CannedScraper, &storage, &terms)
            .run(&resources(), Some("nh"), &mut index)
            .await
            .unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].resource, "broken_nh");
        assert_eq!(*storage.written.lock().unwrap(), vec!["fish_nh".to_string()]);

        assert!(index.catalog(&Namespace::for_resource("broken_nh")).is_none());
        assert!(!index.contains(&Namespace::Generic, "broken_nh_item"));
        let fish = index.catalog(&Namespace::for_resource("fish_nh")).unwrap();
        assert!(fish.contains("fish_nh_item"));
        assert!(index.contains(&Namespace::Generic, "pond"));
    }

    #[tokio::test]
    async fn only_filters_games() {
        let storage = MemoryStorage::default();
        let terms = TermExtractor::default();
        let mut index = LocalizationIndex::new();

        let summary = Runner::new(&CannedScraper, &storage, &terms)
            .run(&resources(), Some("nl"), &mut index)
            .await
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(*storage.written.lock().unwrap(), vec!["bugs_nl".to_string()]);
    }

    #[tokio::test]
    async fn unknown_only_game_is_rejected() {
        let storage = MemoryStorage::default();
        let terms = TermExtractor::default();
        let mut index = LocalizationIndex::new();

        let err = Runner::new(&CannedScraper, &storage, &terms)
            .run(&resources(), Some("pg"), &mut index)
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Config(ref msg) if msg.contains("'pg'")), "{}", err);
        assert!(storage.written.lock().unwrap().is_empty());
    }
}
