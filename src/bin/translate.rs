use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wiki_scrape::cli::TranslateArgs;
use wiki_scrape::config::Settings;
use wiki_scrape::localization::{HttpTranslationSource, Translator};
use wiki_scrape::storage::XmlStorage;
use wiki_scrape::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = TranslateArgs::parse();
    utils::logging::init()?;

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    let storage = XmlStorage::new(&settings.output_dir);
    let values_dir = args.values_dir.unwrap_or_else(|| storage.values_dir());
    let output_dir = args.output_dir.unwrap_or_else(|| storage.root().to_path_buf());

    let client = utils::http::create_client(&settings)?;
    let source = HttpTranslationSource::new(client, &settings.translator.api_base_url, settings.page_retry);

    info!("Translating string files in {}", values_dir.display());
    let summary = Translator::new(&source, &storage, &settings.translator)
        .run(&values_dir, &output_dir)
        .await
        .with_context(|| format!("Failed to translate {}", values_dir.display()))?;

    info!(
        "Translated {} namespaces: {} terms matched, {} without translation, {} files written",
        summary.namespaces,
        summary.matched,
        summary.unmatched,
        summary.written.len()
    );

    Ok(())
}
