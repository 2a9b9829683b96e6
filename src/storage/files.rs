use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};
use crate::localization::{LocalizationIndex, Term};
use crate::models::{Namespace, RecordList};
use crate::storage::xml::{parse_strings, render_record_list, render_strings};
use crate::storage::Storage;

/// Creates `path` and its parents; an existing directory is fine.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ScrapeError::fs(path, e))
}

/// Write to `<path>.tmp` and rename over `path`, so readers never see a
/// truncated file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, bytes).map_err(|e| ScrapeError::fs(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| ScrapeError::fs(path, e))?;
    Ok(())
}

/// Output tree rooted at `root`:
///
/// ```text
/// images/<game>/<asset>
/// data/<game>/<resource>.xml
/// values/<namespace>_strings.xml
/// values/strings.xml
/// ```
#[derive(Debug, Clone)]
pub struct XmlStorage {
    root: PathBuf,
}

impl XmlStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self, game: &str) -> PathBuf {
        self.root.join("images").join(game)
    }

    pub fn data_dir(&self, game: &str) -> PathBuf {
        self.root.join("data").join(game)
    }

    pub fn values_dir(&self) -> PathBuf {
        self.root.join("values")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Storage for XmlStorage {
    async fn prepare_game(&self, game: &str) -> Result<PathBuf> {
        let images = self.images_dir(game);
        ensure_dir(&images)?;
        ensure_dir(&self.data_dir(game))?;
        Ok(images)
    }

    async fn write_records(&self, game: &str, resource: &str, records: &RecordList) -> Result<PathBuf> {
        let dir = self.data_dir(game);
        ensure_dir(&dir)?;
        let path = dir.join(format!("{}.xml", resource));
        write_atomic(&path, &render_record_list(records)?)?;
        info!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }

    async fn load_index(&self) -> Result<LocalizationIndex> {
        let mut index = LocalizationIndex::new();
        let dir = self.values_dir();
        if !dir.is_dir() {
            return Ok(index);
        }

        for (namespace, terms) in self.read_values(&dir).await? {
            let catalog = index.catalog_mut(&namespace);
            for term in terms {
                catalog.insert(&term.key, &term.text);
            }
        }
        info!("Loaded {} existing translation keys from {}", index.key_count(), dir.display());
        Ok(index)
    }

    async fn write_index(&self, index: &LocalizationIndex) -> Result<Vec<PathBuf>> {
        let dir = self.values_dir();
        let mut written = Vec::new();
        for (namespace, catalog) in index.iter() {
            written.push(self.write_strings(&dir, namespace, catalog.terms()).await?);
        }
        Ok(written)
    }

    async fn read_values(&self, dir: &Path) -> Result<Vec<(Namespace, Vec<Term>)>> {
        let entries = fs::read_dir(dir).map_err(|e| ScrapeError::fs(dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map(|ext| ext == "xml").unwrap_or(false))
            .collect();
        paths.sort();

        let mut out = Vec::new();
        for path in paths {
            let Some(namespace) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Namespace::from_file_stem)
            else {
                debug!("Skipping {}", path.display());
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|e| ScrapeError::fs(&path, e))?;
            out.push((namespace, parse_strings(&content)?));
        }
        Ok(out)
    }

    async fn write_strings(&self, dir: &Path, namespace: &Namespace, terms: &[Term]) -> Result<PathBuf> {
        ensure_dir(dir)?;
        let path = dir.join(namespace.file_name());
        write_atomic(&path, &render_strings(terms)?)?;
        debug!("Wrote {} strings to {}", terms.len(), path.display());
        Ok(path)
    }
}
