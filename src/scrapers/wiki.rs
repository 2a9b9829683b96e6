use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::{ResourceDescriptor, Settings};
use crate::error::{Result, ScrapeError};
use crate::models::RecordList;
use crate::parsers::{parse_rows, Sanitizer};
use crate::scrapers::{ImageFetcher, TableExtractor, TableScraper};
use crate::utils::http::fetch_with_retry;

/// Scrapes resource tables from wiki pages under `settings.base_url`.
pub struct WikiScraper {
    client: Client,
    settings: Arc<Settings>,
    images: Arc<dyn ImageFetcher>,
    sanitizer: Sanitizer,
}

impl WikiScraper {
    pub fn new(client: Client, settings: Arc<Settings>, images: Arc<dyn ImageFetcher>) -> Self {
        let sanitizer = Sanitizer::new(settings.reserved_keywords.clone());
        Self {
            client,
            settings,
            images,
            sanitizer,
        }
    }

    pub fn page_url(&self, descriptor: &ResourceDescriptor) -> String {
        format!("{}{}", self.settings.base_url, descriptor.endpoint)
    }
}

#[async_trait]
impl TableScraper for WikiScraper {
    async fn scrape(&self, name: &str, descriptor: &ResourceDescriptor, image_dir: &Path) -> Result<RecordList> {
        let url = self.page_url(descriptor);
        info!("Scraping {} from {}", name, url);

        let response = fetch_with_retry(&self.client, &url, self.settings.page_retry).await?;
        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::transport(&url, e))?;

        // Parse synchronously; the DOM is not Send and must not cross an await.
        let rows = parse_rows(&html, &descriptor.table_selector)?;
        info!("Found {} table rows for {}", rows.len(), name);

        TableExtractor::new(descriptor, &self.sanitizer, self.images.as_ref(), image_dir)
            .extract(rows)
            .await
    }
}
