use async_trait::async_trait;
use std::path::Path;

use crate::config::ResourceDescriptor;
use crate::error::Result;
use crate::models::RecordList;

pub mod builder;
mod extractor;
mod images;
mod wiki;

pub use builder::RecordListBuilder;
pub use extractor::TableExtractor;
pub use images::{asset_name, full_size_url, HttpImageFetcher, ImageFetcher};
pub use wiki::WikiScraper;

#[async_trait]
pub trait TableScraper: Send + Sync {
    /// Fetch and extract one resource, saving its images under `image_dir`.
    async fn scrape(&self, name: &str, descriptor: &ResourceDescriptor, image_dir: &Path) -> Result<RecordList>;
}
