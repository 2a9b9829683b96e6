use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use wiki_scrape::cli::ScrapeArgs;
use wiki_scrape::config::{load_resources, Settings};
use wiki_scrape::localization::{LocalizationIndex, TermExtractor};
use wiki_scrape::parsers::Sanitizer;
use wiki_scrape::runner::Runner;
use wiki_scrape::scrapers::{HttpImageFetcher, ImageFetcher, WikiScraper};
use wiki_scrape::storage::{Storage, XmlStorage};
use wiki_scrape::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ScrapeArgs::parse();

    // Initialize logging
    utils::logging::init()?;

    info!("Starting Wiki Scrape");

    // Load configuration
    let settings = Arc::new(Settings::load(args.config.as_deref()).context("Failed to load settings")?);
    let resources_path = args.resources.clone().unwrap_or_else(|| settings.resources_path.clone());
    let resources = load_resources(&resources_path)
        .with_context(|| format!("Failed to load resources from {}", resources_path.display()))?;

    let storage = XmlStorage::new(&settings.output_dir);
    let sanitizer = Sanitizer::new(settings.reserved_keywords.clone());

    // HTTP client shared by page and image fetches
    let client = utils::http::create_client(&settings)?;
    let images: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new(
        client.clone(),
        &settings.base_url,
        settings.image_retry,
        sanitizer.clone(),
    )?);
    let scraper = WikiScraper::new(client, settings.clone(), images);
    let terms = TermExtractor::new(sanitizer, settings.translatable_fields.clone());

    let mut index = if args.fresh {
        LocalizationIndex::new()
    } else {
        storage.load_index().await.context("Failed to read existing string files")?
    };

    let runner = Runner::new(&scraper, &storage, &terms);
    let summary = runner
        .run(&resources, args.only.as_deref(), &mut index)
        .await
        .context("Scrape run failed")?;

    for failure in &summary.failed {
        error!("{}/{} failed: {}", failure.game, failure.resource, failure.error);
    }

    if !summary.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
