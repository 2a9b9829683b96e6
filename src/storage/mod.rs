use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::localization::{LocalizationIndex, Term};
use crate::models::{Namespace, RecordList};

mod files;
pub mod xml;

pub use files::{ensure_dir, write_atomic, XmlStorage};

#[async_trait]
pub trait Storage: Send + Sync {
    /// Create the game's image and data directories; returns the image directory.
    async fn prepare_game(&self, game: &str) -> Result<PathBuf>;
    async fn write_records(&self, game: &str, resource: &str, records: &RecordList) -> Result<PathBuf>;
    /// Seed an index from string files left by an earlier run.
    async fn load_index(&self) -> Result<LocalizationIndex>;
    async fn write_index(&self, index: &LocalizationIndex) -> Result<Vec<PathBuf>>;
    /// Every string file under `dir`, by namespace.
    async fn read_values(&self, dir: &Path) -> Result<Vec<(Namespace, Vec<Term>)>>;
    async fn write_strings(&self, dir: &Path, namespace: &Namespace, terms: &[Term]) -> Result<PathBuf>;
}
